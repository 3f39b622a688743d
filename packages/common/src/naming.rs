//! Case conversions shared by the parser, resolver and generators.

/// `MenuBarItem` / `menuBarItem` / `menu_bar_item` → `menu-bar-item`
pub fn to_kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let chars: Vec<char> = name.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == ' ' || c == '-' {
            if !out.ends_with('-') && !out.is_empty() {
                out.push('-');
            }
            continue;
        }

        if c.is_uppercase() {
            let prev_lower = i > 0 && (chars[i - 1].is_lowercase() || chars[i - 1].is_ascii_digit());
            let next_lower = chars.get(i + 1).map_or(false, |n| n.is_lowercase());
            let prev_upper = i > 0 && chars[i - 1].is_uppercase();
            if !out.is_empty() && !out.ends_with('-') && (prev_lower || (prev_upper && next_lower)) {
                out.push('-');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    out.trim_matches('-').to_string()
}

/// True for names like `Button` or `ListItem`
pub fn is_pascal_case(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Custom-tag name used by the template runtime: `c-<kebab>`
pub fn component_tag(name: &str) -> String {
    format!("c-{}", to_kebab_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kebab_case() {
        assert_eq!(to_kebab_case("MenuBarItem"), "menu-bar-item");
        assert_eq!(to_kebab_case("menuBarItem"), "menu-bar-item");
        assert_eq!(to_kebab_case("HTMLInput"), "html-input");
        assert_eq!(to_kebab_case("Heading1"), "heading1");
        assert_eq!(to_kebab_case("already-kebab"), "already-kebab");
    }

    #[test]
    fn test_component_tag() {
        assert_eq!(component_tag("ListItem"), "c-list-item");
        assert!(is_pascal_case("ListItem"));
        assert!(!is_pascal_case("listItem"));
        assert!(!is_pascal_case("div"));
    }
}
