/// Options for Jinja compilation
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Indentation string for nested blocks and tag attributes
    pub indent: String,
    /// Name of the template variable collecting CSS classes
    pub class_var: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
            class_var: "css_classes".to_string(),
        }
    }
}

/// Line-oriented output buffer with an indentation level
#[derive(Debug)]
pub struct Context {
    pub options: CompileOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    pub fn new(options: CompileOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    pub fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub fn add_line(&mut self, text: &str) {
        self.add_indent();
        self.add(text);
        self.add("\n");
    }

    /// Add every line of a multi-line block at the current depth
    pub fn add_lines(&mut self, text: &str) {
        for line in text.lines() {
            if line.trim().is_empty() {
                self.add("\n");
            } else {
                self.add_line(line);
            }
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn get_output(self) -> String {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indentation() {
        let mut ctx = Context::new(CompileOptions::default());
        ctx.add_line("<div>");
        ctx.indent();
        ctx.add_lines("a\n\nb");
        ctx.dedent();
        ctx.dedent();
        ctx.add_line("</div>");
        assert_eq!(ctx.get_output(), "<div>\n    a\n\n    b\n</div>\n");
    }
}
