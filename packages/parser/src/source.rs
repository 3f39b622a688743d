//! Component source model: declaration, props, defaults and render body.
//!
//! Boundaries (parameter lists, block bodies, the final `return`) are found
//! on a copy of the source in which every JSX element is blanked out. JSX
//! text routinely contains apostrophes, which would otherwise open phantom
//! string literals for the quote-aware scanners.

use crate::ast::{AttributeDescriptor, DefaultValues, DynamicTag, ImportDecl};
use crate::defaults::{parse_default_args, parse_destructuring, Destructuring};
use crate::error::{ParseError, ParseResult};
use crate::imports::parse_imports;
use crate::interface::TypeScope;
use crate::jsx::{self, JsxElement};
use crate::scan::{
    balanced_end, code_chars, line_of, skip_whitespace, split_top_level, strip_comments,
    strip_outer_parens,
};
use regex::Regex;
use roos_common::to_kebab_case;
use std::sync::LazyLock;
use tracing::{debug, instrument};

static FORWARD_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(export\s+)?(?:const|let)\s+([A-Z][\w$]*)\s*(?::[^=]+)?=\s*(?:React\.)?forwardRef\s*(?:<([^()]*)>)?\s*\(",
    )
    .unwrap()
});
static ARROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(export\s+)?const\s+([A-Z][\w$]*)\s*(?::\s*([^=]+?))?\s*=\s*(?:(?:React\.)?memo\s*\(\s*)?\(",
    )
    .unwrap()
});
static FUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(export\s+)?(?:default\s+)?function\s+([A-Z][\w$]*)\s*(?:<[^>(]*>)?\s*\(").unwrap()
});

/// Everything the later stages need from one component file
#[derive(Debug, Clone)]
pub struct SourceModel {
    pub name: String,
    /// Name of the props interface the attributes came from
    pub props_type: Option<String>,
    pub attributes: Vec<AttributeDescriptor>,
    pub defaults: DefaultValues,
    pub destructuring: Option<Destructuring>,
    pub imports: Vec<ImportDecl>,
    /// Every interface and alias in the file, for array item lookups
    pub types: TypeScope,
    /// Block text before the final `return`
    pub preamble: String,
    /// The returned JSX; empty when it could not be located
    pub render_body: String,
    /// 1-based line of the render body in the source file
    pub render_line: usize,
    pub dynamic_tag: Option<DynamicTag>,
    /// Source with comments removed
    pub source: String,
}

impl SourceModel {
    /// The outermost element of the render body
    pub fn root_element(&self) -> Option<JsxElement> {
        jsx::first_element(&self.render_body)
    }

    /// Name bound by `...rest` in the parameter destructuring
    pub fn rest_prop(&self) -> Option<&str> {
        self.destructuring.as_ref()?.rest.as_deref()
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

#[derive(Debug, Clone)]
struct Declaration {
    name: String,
    exported: bool,
    start: usize,
    params_open: usize,
    /// Type annotation or generic carrying the props type
    annotation: Option<String>,
}

/// Parse one component file.
///
/// `name_hint` (the component's directory or file name) picks between
/// several declarations in the same file.
#[instrument(skip(source, defaults_source), fields(hint = ?name_hint))]
pub fn parse_component(
    source: &str,
    defaults_source: Option<&str>,
    name_hint: Option<&str>,
) -> ParseResult<SourceModel> {
    let stripped = strip_comments(source);
    let masked = mask_jsx(&stripped);

    let decl = find_declaration(&masked, name_hint)
        .ok_or_else(|| ParseError::component_not_found(name_hint))?;
    debug!(name = %decl.name, exported = decl.exported, "found component declaration");

    let params_close = balanced_end(&masked, decl.params_open).ok_or_else(|| {
        ParseError::invalid_syntax(decl.params_open, "unterminated parameter list")
    })?;
    let params = &stripped[decl.params_open..=params_close];

    let (preamble, render_start, render_end) = locate_render(&stripped, &masked, params_close + 1);
    let mut render_body = stripped[render_start..render_end].trim().to_string();
    if jsx::first_tag_start(&render_body).is_none() {
        debug!(name = %decl.name, "render body has no JSX");
        render_body.clear();
    }

    let types = TypeScope::parse(source);
    let preferred = param_type(params).or_else(|| decl.annotation.clone());
    let props_type = types.props_type_name(preferred.as_deref());
    let mut attributes = props_type
        .as_deref()
        .map(|name| types.attributes_of(name))
        .unwrap_or_default();

    let table = defaults_source.map(parse_default_args).unwrap_or_default();
    let destructuring = parse_destructuring(params);
    let defaults = match &destructuring {
        Some(d) => d.split_defaults(&table),
        None => DefaultValues {
            actual: Default::default(),
            examples: table,
        },
    };
    defaults.apply_to(&mut attributes);

    let preamble = stripped[preamble.0..preamble.1].to_string();
    let dynamic_tag = detect_dynamic_tag(&preamble, &render_body);

    debug!(
        name = %decl.name,
        attributes = attributes.len(),
        actual_defaults = defaults.actual.len(),
        example_values = defaults.examples.len(),
        "parsed component source"
    );

    Ok(SourceModel {
        name: decl.name,
        props_type,
        attributes,
        defaults,
        destructuring,
        imports: parse_imports(&stripped),
        types,
        preamble,
        render_body,
        render_line: line_of(&stripped, render_start),
        dynamic_tag,
        source: stripped,
    })
}

/// Blank every JSX element (outside string literals) to spaces, keeping
/// newlines and byte offsets.
pub fn mask_jsx(source: &str) -> String {
    let mut bytes = source.as_bytes().to_vec();
    let mut pos = 0;

    'scan: while pos < source.len() {
        for (i, c, _) in code_chars(&source[pos..]) {
            let at = pos + i;
            if c == '<' && can_start_jsx(source, at) {
                if let Some(element) = jsx::parse_element(source, at) {
                    for b in &mut bytes[at..element.end] {
                        if *b != b'\n' {
                            *b = b' ';
                        }
                    }
                    pos = element.end;
                    continue 'scan;
                }
            }
        }
        break;
    }

    String::from_utf8_lossy(&bytes).into_owned()
}

/// A `<` opens JSX only in expression position: `(<`, `return <`, `=> <`...
fn can_start_jsx(source: &str, at: usize) -> bool {
    let next = source[at + 1..].chars().next();
    if !next.map_or(false, |c| c.is_ascii_alphabetic() || c == '>') {
        return false;
    }
    let before = source[..at].trim_end();
    if before.ends_with("return") {
        return true;
    }
    match before.chars().next_back() {
        None => true,
        Some(c) => matches!(c, '(' | '?' | ':' | '=' | '>' | '&' | '|' | ',' | '{' | '[' | ';'),
    }
}

fn find_declaration(masked: &str, hint: Option<&str>) -> Option<Declaration> {
    let mut found = Vec::new();

    for caps in FORWARD_REF_RE.captures_iter(masked) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        let Some(params_open) = forward_ref_params(masked, whole.end()) else {
            continue;
        };
        let annotation = caps
            .get(3)
            .and_then(|g| split_top_level(g.as_str(), ",").last().map(|s| s.to_string()));
        found.push(Declaration {
            name: name.as_str().to_string(),
            exported: caps.get(1).is_some(),
            start: whole.start(),
            params_open,
            annotation,
        });
    }

    for caps in ARROW_RE.captures_iter(masked) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        let params_open = whole.end() - 1;
        if !is_arrow_function(masked, params_open) {
            continue;
        }
        found.push(Declaration {
            name: name.as_str().to_string(),
            exported: caps.get(1).is_some(),
            start: whole.start(),
            params_open,
            annotation: caps.get(3).and_then(|a| generic_argument(a.as_str())),
        });
    }

    for caps in FUNCTION_RE.captures_iter(masked) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        found.push(Declaration {
            name: name.as_str().to_string(),
            exported: caps.get(1).is_some(),
            start: whole.start(),
            params_open: whole.end() - 1,
            annotation: None,
        });
    }

    found.sort_by_key(|d| d.start);
    // A forwardRef render function named like its wrapper shows up twice
    found.dedup_by(|b, a| a.name == b.name);

    if let Some(hint) = hint {
        let wanted = to_kebab_case(hint);
        if let Some(d) = found.iter().find(|d| to_kebab_case(&d.name) == wanted) {
            return Some(d.clone());
        }
    }
    found
        .iter()
        .find(|d| d.exported)
        .or_else(|| found.first())
        .cloned()
}

/// `forwardRef((props, ref) => ...)` or `forwardRef(function X(props, ref) {`
fn forward_ref_params(masked: &str, after_paren: usize) -> Option<usize> {
    let pos = skip_whitespace(masked, after_paren);
    let rest = masked.get(pos..)?;
    if rest.starts_with('(') {
        return Some(pos);
    }
    if rest.starts_with("function") {
        return rest.find('(').map(|p| pos + p);
    }
    None
}

fn is_arrow_function(masked: &str, params_open: usize) -> bool {
    let Some(close) = balanced_end(masked, params_open) else {
        return false;
    };
    let after = &masked[close + 1..];
    let trimmed = after.trim_start();
    if trimmed.starts_with("=>") {
        return true;
    }
    // `(props): JSX.Element =>`
    trimmed.starts_with(':')
        && trimmed
            .find("=>")
            .map_or(false, |arrow| !trimmed[..arrow].contains([';', '{', '=']))
}

/// `React.FC<IButtonProps>` → `IButtonProps`
fn generic_argument(annotation: &str) -> Option<String> {
    let open = annotation.find('<')?;
    let close = annotation.rfind('>')?;
    if close <= open {
        return None;
    }
    split_top_level(&annotation[open + 1..close], ",")
        .last()
        .map(|s| s.to_string())
}

/// Type annotation of the first parameter: `({ a }: IProps)` → `IProps`
fn param_type(params: &str) -> Option<String> {
    let inner = strip_outer_parens(params);
    let first = split_top_level(inner, ",").into_iter().next()?;
    let colon = crate::scan::find_top_level(first, ":")?;
    let ty = first[colon + 1..].trim();
    (!ty.is_empty()).then(|| ty.to_string())
}

type Span = (usize, usize);

/// Returns the preamble span and the render expression span.
fn locate_render(source: &str, masked: &str, after_params: usize) -> (Span, usize, usize) {
    let empty = ((after_params, after_params), after_params, after_params);

    let mut body_start = None;
    for (i, c, depth) in code_chars(&masked[after_params..]) {
        if depth != 0 {
            continue;
        }
        let at = after_params + i;
        if masked[at..].starts_with("=>") {
            body_start = Some(skip_whitespace(source, at + 2));
            break;
        }
        if c == '{' {
            body_start = Some(at);
            break;
        }
    }
    let Some(start) = body_start else {
        return empty;
    };

    if !masked[start..].starts_with('{') {
        let (s, e) = expression_span(source, masked, start);
        return ((start, start), s, e);
    }

    let close = balanced_end(masked, start).unwrap_or(masked.len());
    let block = &masked[start + 1..close];
    let Some(ret) = last_top_level_return(block) else {
        return ((start + 1, close), close, close);
    };
    let ret_at = start + 1 + ret;
    let expr_start = skip_whitespace(source, ret_at + "return".len());
    let (s, e) = expression_span(source, masked, expr_start);
    ((start + 1, ret_at), s, e)
}

fn last_top_level_return(block: &str) -> Option<usize> {
    let bytes = block.as_bytes();
    code_chars(block)
        .filter(|&(i, c, depth)| {
            depth == 0
                && c == 'r'
                && block[i..].starts_with("return")
                && (i == 0 || !is_word_byte(bytes[i - 1]))
                && bytes.get(i + 6).map_or(true, |&b| !is_word_byte(b))
        })
        .map(|(i, _, _)| i)
        .last()
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Span of the expression starting at `start`: a parenthesized group, a
/// JSX element, or everything up to the end of the statement.
fn expression_span(source: &str, masked: &str, start: usize) -> (usize, usize) {
    let rest = &masked[start..];
    if rest.starts_with('(') {
        if let Some(close) = balanced_end(masked, start) {
            return (start + 1, close);
        }
    }
    if source[start..].starts_with('<') {
        if let Some(element) = jsx::parse_element(source, start) {
            return (start, element.end);
        }
    }

    let mut depth = 0usize;
    for (i, c, _) in code_chars(rest) {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                if depth == 0 {
                    return (start, start + i);
                }
                depth -= 1;
            }
            ';' if depth == 0 => return (start, start + i),
            _ => {}
        }
    }
    (start, masked.len())
}

static CONST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:const|let)\s+([A-Za-z_$][\w$]*)\s*(?::[^=]+)?=\s*([^;\n]+)").unwrap()
});

/// `const Tag = \`h${level}\`` (or `as || 'div'`) used as the root tag
fn detect_dynamic_tag(preamble: &str, render_body: &str) -> Option<DynamicTag> {
    let root = jsx::first_element(render_body)?;
    if !root.is_component() || root.name.contains('.') {
        return None;
    }
    CONST_RE.captures_iter(preamble).find_map(|caps| {
        if caps.get(1)?.as_str() != root.name {
            return None;
        }
        let expr = caps.get(2)?.as_str().trim();
        let expr = match crate::scan::find_top_level(expr, " as ") {
            Some(pos) => expr[..pos].trim(),
            None => expr,
        };
        if expr.starts_with('<') || expr.contains("=>") {
            return None;
        }
        Some(DynamicTag {
            variable: root.name.clone(),
            expression: expr.to_string(),
        })
    })
}
