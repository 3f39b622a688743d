//! Props interfaces and local type aliases → attribute descriptors.

use crate::ast::{AttributeDescriptor, AttributeType};
use crate::scan::{
    self, code_chars, contains_top_level, extract_balanced_inner, split_top_level, string_literal,
    strip_outer_parens,
};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static INTERFACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:export\s+)?interface\s+([A-Za-z_$][\w$]*)\s*(?:<[^>{]*>)?\s*(?:extends\s+([^{]+?))?\s*\{")
        .unwrap()
});
static TYPE_ALIAS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:export\s+)?type\s+([A-Za-z_$][\w$]*)\s*(?:<[^>=]*>)?\s*=").unwrap()
});
static MEMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)^(?:readonly\s+)?(?:'([^']+)'|"([^"]+)"|([A-Za-z_$][\w$]*))\s*(\?)?\s*([:(])"#)
        .unwrap()
});

const MAX_TYPE_DEPTH: usize = 8;

#[derive(Debug, Clone, PartialEq)]
struct RawMember {
    name: String,
    optional: bool,
    type_text: String,
    description: Option<String>,
}

#[derive(Debug, Clone)]
enum TypeDecl {
    Interface {
        extends: Vec<String>,
        members: Vec<RawMember>,
    },
    Alias(String),
}

/// Every interface and type alias declared in one source file.
#[derive(Debug, Clone, Default)]
pub struct TypeScope {
    decls: HashMap<String, TypeDecl>,
    order: Vec<String>,
}

impl TypeScope {
    pub fn parse(source: &str) -> Self {
        let mut scope = TypeScope::default();

        for caps in INTERFACE_RE.captures_iter(source) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Some(body) = extract_balanced_inner(source, whole.end() - 1) else {
                continue;
            };
            let extends = caps
                .get(2)
                .map(|m| {
                    split_top_level(m.as_str(), ",")
                        .into_iter()
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            scope.insert(
                name.as_str(),
                TypeDecl::Interface {
                    extends,
                    members: parse_members(body),
                },
            );
        }

        for caps in TYPE_ALIAS_RE.captures_iter(source) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let rest = &source[whole.end()..];
            let (end, _) = member_end(rest);
            let text = rest[..end].trim().trim_end_matches(';').trim();
            scope.insert(name.as_str(), TypeDecl::Alias(text.to_string()));
        }

        scope
    }

    fn insert(&mut self, name: &str, decl: TypeDecl) {
        if !self.decls.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.decls.insert(name.to_string(), decl);
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.decls.contains_key(name)
    }

    /// Declared names, in source order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Pick the props declaration: the preferred name if declared, else the
    /// first `*Props` declaration, else the only interface.
    pub fn props_type_name(&self, preferred: Option<&str>) -> Option<String> {
        if let Some(name) = preferred.map(base_type_name) {
            if self.contains(name) {
                return Some(name.to_string());
            }
        }
        if let Some(name) = self.order.iter().find(|n| n.ends_with("Props")) {
            return Some(name.clone());
        }
        let interfaces: Vec<&String> = self
            .order
            .iter()
            .filter(|n| matches!(self.decls.get(*n), Some(TypeDecl::Interface { .. })))
            .collect();
        match interfaces.as_slice() {
            [only] => Some((*only).clone()),
            _ => None,
        }
    }

    /// Attributes of the props declaration (see [`Self::props_type_name`]).
    pub fn props_attributes(&self, preferred: Option<&str>) -> Vec<AttributeDescriptor> {
        self.props_type_name(preferred)
            .map(|name| self.attributes_of(&name))
            .unwrap_or_default()
    }

    /// Attributes of a named interface or object-type alias, inherited
    /// members first and own members overriding them.
    pub fn attributes_of(&self, name: &str) -> Vec<AttributeDescriptor> {
        let mut visiting = HashSet::new();
        self.members_of(name, &mut visiting)
            .into_iter()
            .map(|m| self.describe(m))
            .collect()
    }

    /// Member names of a declaration, for array-shape matching
    pub fn member_names(&self, name: &str) -> Vec<String> {
        let mut visiting = HashSet::new();
        self.members_of(name, &mut visiting)
            .into_iter()
            .map(|m| m.name)
            .collect()
    }

    fn members_of(&self, type_ref: &str, visiting: &mut HashSet<String>) -> Vec<RawMember> {
        let type_ref = type_ref.trim();

        if type_ref.starts_with('{') {
            return parse_members(&type_ref[1..type_ref.len().saturating_sub(1)]);
        }

        if let Some((wrapper, args)) = generic_parts(type_ref) {
            let args = split_top_level(args, ",");
            let Some(target) = args.first() else {
                return Vec::new();
            };
            let mut members = self.members_of(target, visiting);
            let keys: Vec<String> = args
                .get(1)
                .map(|k| {
                    split_top_level(k, "|")
                        .into_iter()
                        .filter_map(string_literal)
                        .collect()
                })
                .unwrap_or_default();
            match wrapper {
                "Omit" => members.retain(|m| !keys.contains(&m.name)),
                "Pick" => members.retain(|m| keys.contains(&m.name)),
                "Partial" => members.iter_mut().for_each(|m| m.optional = true),
                "Required" => members.iter_mut().for_each(|m| m.optional = false),
                _ => return self.members_of(wrapper, visiting),
            }
            return members;
        }

        let name = base_type_name(type_ref);
        if !visiting.insert(name.to_string()) {
            return Vec::new();
        }

        let members = match self.decls.get(name) {
            Some(TypeDecl::Interface { extends, members }) => {
                let mut out: Vec<RawMember> = Vec::new();
                for parent in extends {
                    merge_members(&mut out, self.members_of(parent, visiting));
                }
                merge_members(&mut out, members.clone());
                out
            }
            Some(TypeDecl::Alias(text)) => {
                let mut out = Vec::new();
                for part in split_top_level(text, "&") {
                    merge_members(&mut out, self.members_of(part, visiting));
                }
                out
            }
            None => Vec::new(),
        };

        visiting.remove(name);
        members
    }

    fn describe(&self, member: RawMember) -> AttributeDescriptor {
        let info = self.classify(&member.type_text, 0);
        let mut types = Vec::new();
        if !info.enum_values.is_empty() {
            types.push(AttributeType::Enum);
        }
        for ty in info.types {
            if !types.contains(&ty) {
                types.push(ty);
            }
        }
        if types == [AttributeType::Enum] {
            types.push(if info.numeric_enum {
                AttributeType::Number
            } else {
                AttributeType::String
            });
        }
        if types.is_empty() {
            types.push(AttributeType::String);
        }

        AttributeDescriptor {
            name: member.name,
            types,
            required: !member.optional && !info.nullable,
            enum_values: info.enum_values,
            description: member.description,
            default: None,
            item_type: info.item_type,
        }
    }

    fn classify(&self, type_text: &str, depth: usize) -> TypeInfo {
        let mut info = TypeInfo::default();
        let t = strip_outer_parens(type_text);

        if contains_top_level(t, "=>") {
            info.push(AttributeType::Function);
            return info;
        }

        for part in split_top_level(t, "|") {
            let p = strip_outer_parens(part);
            if matches!(p, "undefined" | "null" | "void" | "never") {
                info.nullable = true;
                continue;
            }
            let primitive = match p {
                "string" => Some(AttributeType::String),
                "number" => Some(AttributeType::Number),
                "boolean" | "true" | "false" => Some(AttributeType::Boolean),
                "object" | "any" | "unknown" => Some(AttributeType::Object),
                _ => None,
            };
            if let Some(ty) = primitive {
                info.push(ty);
                continue;
            }
            if contains_top_level(p, "=>") {
                info.push(AttributeType::Function);
                continue;
            }

            if let Some(value) = string_literal(p) {
                if !info.enum_values.contains(&value) {
                    info.enum_values.push(value);
                }
            } else if p.parse::<f64>().is_ok() {
                info.numeric_enum = true;
                if !info.enum_values.iter().any(|v| v == p) {
                    info.enum_values.push(p.to_string());
                }
            } else if let Some(item) = p.strip_suffix("[]") {
                info.push(AttributeType::Array);
                info.item_type = Some(strip_outer_parens(item).to_string());
            } else if let Some((wrapper, args)) = generic_parts(p) {
                match wrapper {
                    "Array" | "ReadonlyArray" => {
                        info.push(AttributeType::Array);
                        info.item_type = Some(args.trim().to_string());
                    }
                    "Record" | "Map" => info.push(AttributeType::Object),
                    w if w.ends_with("Handler") => info.push(AttributeType::Function),
                    _ => info.push(AttributeType::String),
                }
            } else if p.starts_with('{') {
                info.push(AttributeType::Object);
            } else if is_node_type(p) || p.starts_with("keyof ") {
                info.push(AttributeType::String);
            } else if p.ends_with("Handler") || p == "Function" {
                info.push(AttributeType::Function);
            } else if let Some(decl) = self.decls.get(base_type_name(p)) {
                match decl {
                    TypeDecl::Alias(text) if depth < MAX_TYPE_DEPTH => {
                        info.merge(self.classify(text, depth + 1));
                    }
                    _ => info.push(AttributeType::Object),
                }
            } else {
                info.push(AttributeType::String);
            }
        }

        info
    }
}

#[derive(Debug, Default)]
struct TypeInfo {
    types: Vec<AttributeType>,
    enum_values: Vec<String>,
    item_type: Option<String>,
    nullable: bool,
    numeric_enum: bool,
}

impl TypeInfo {
    fn push(&mut self, ty: AttributeType) {
        if !self.types.contains(&ty) {
            self.types.push(ty);
        }
    }

    fn merge(&mut self, other: TypeInfo) {
        for ty in other.types {
            self.push(ty);
        }
        for value in other.enum_values {
            if !self.enum_values.contains(&value) {
                self.enum_values.push(value);
            }
        }
        self.item_type = self.item_type.take().or(other.item_type);
        self.nullable |= other.nullable;
        self.numeric_enum |= other.numeric_enum;
    }
}

fn is_node_type(t: &str) -> bool {
    ["ReactNode", "ReactElement", "JSX.Element", "ReactChild", "ReactText"]
        .iter()
        .any(|n| t.ends_with(n))
}

/// `Omit<IProps, 'a'>` → `("Omit", "IProps, 'a'")`
fn generic_parts(t: &str) -> Option<(&str, &str)> {
    let t = t.trim();
    let open = t.find('<')?;
    if !t.ends_with('>') {
        return None;
    }
    let wrapper = t[..open].trim();
    if !scan::is_member_path(wrapper) {
        return None;
    }
    let wrapper = wrapper.rsplit('.').next().unwrap_or(wrapper);
    Some((wrapper, &t[open + 1..t.len() - 1]))
}

/// `React.FC<IProps>` / `IProps<T>` → the bare declaration name
fn base_type_name(t: &str) -> &str {
    let t = t.trim();
    let t = t.split('<').next().unwrap_or(t).trim();
    t.rsplit('.').next().unwrap_or(t)
}

fn merge_members(out: &mut Vec<RawMember>, members: Vec<RawMember>) {
    for member in members {
        match out.iter_mut().find(|m| m.name == member.name) {
            Some(existing) => *existing = member,
            None => out.push(member),
        }
    }
}

/// End of the member starting at the beginning of `rest`: the first depth-0
/// `;`/`,` outside generic arguments, or a newline not continued by a
/// union/intersection. Returns the end offset and how many bytes to consume.
fn member_end(rest: &str) -> (usize, usize) {
    let mut angle = 0usize;
    let mut prev = ' ';

    for (i, c, depth) in code_chars(rest) {
        let last = prev;
        prev = c;
        if depth != 0 {
            continue;
        }
        match c {
            '<' => angle += 1,
            '>' if last != '=' => angle = angle.saturating_sub(1),
            ';' | ',' if angle == 0 => return (i, i + 1),
            '\n' if angle == 0 => {
                let before = rest[..i].trim_end();
                let after = rest[i..].trim_start();
                let continued = before.ends_with(['|', '&', ':', '=', '(', '<'])
                    || after.starts_with(['|', '&', '=', '?'])
                    || before.trim().is_empty();
                if !continued {
                    return (i, i + 1);
                }
            }
            _ => {}
        }
    }
    (rest.len(), rest.len())
}

fn parse_members(body: &str) -> Vec<RawMember> {
    let mut members = Vec::new();
    let mut doc: Option<String> = None;
    let mut pos = 0;

    while pos < body.len() {
        pos = scan::skip_whitespace(body, pos);
        if pos >= body.len() {
            break;
        }
        let rest = &body[pos..];

        if rest.starts_with("/*") {
            let end = rest.find("*/").map(|e| e + 2).unwrap_or(rest.len());
            doc = clean_doc(&rest[..end]);
            pos += end;
            continue;
        }
        if rest.starts_with("//") {
            pos += rest.find('\n').unwrap_or(rest.len());
            continue;
        }

        let (end, consumed) = member_end(rest);
        if let Some(member) = parse_member(rest[..end].trim(), doc.take()) {
            members.push(member);
        }
        pos += consumed.max(1);
    }

    members
}

fn parse_member(text: &str, description: Option<String>) -> Option<RawMember> {
    let caps = MEMBER_RE.captures(text)?;
    let name = caps
        .get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))?
        .as_str()
        .to_string();
    let optional = caps.get(4).is_some();
    let delimiter = caps.get(5)?;

    let type_text = if delimiter.as_str() == "(" {
        // Method signature
        "() => void".to_string()
    } else {
        text[delimiter.end()..].trim().to_string()
    };

    Some(RawMember {
        name,
        optional,
        type_text,
        description,
    })
}

fn clean_doc(comment: &str) -> Option<String> {
    let inner = comment
        .trim_start_matches("/**")
        .trim_start_matches("/*")
        .trim_end_matches("*/");
    let text = inner
        .lines()
        .map(|line| line.trim().trim_start_matches('*').trim())
        .filter(|line| !line.is_empty() && !line.starts_with('@'))
        .collect::<Vec<_>>()
        .join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
type Size = 'sm' | 'md' | 'lg';

export interface IBaseProps {
  /** Extra class names */
  className?: string;
}

export interface IButtonProps extends IBaseProps {
  /**
   * Visual style of the button
   * @default 'primary'
   */
  kind?: 'primary' | 'secondary' | 'tertiary';
  size?: Size;
  label: string | React.ReactNode;
  busy?: boolean
  items?: IMenuItem[];
  onClick?: (event: MouseEvent) => void;
  onFocus?(): void;
  level: 1 | 2 | 3;
  'aria-label'?: string | undefined;
}
"#;

    fn find<'a>(attrs: &'a [AttributeDescriptor], name: &str) -> &'a AttributeDescriptor {
        attrs.iter().find(|a| a.name == name).unwrap()
    }

    #[test]
    fn test_props_interface_with_extends_and_aliases() {
        let scope = TypeScope::parse(SOURCE);
        assert_eq!(scope.props_type_name(None).as_deref(), Some("IBaseProps"));

        let attrs = scope.props_attributes(Some("IButtonProps"));
        let names: Vec<&str> = attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "className",
                "kind",
                "size",
                "label",
                "busy",
                "items",
                "onClick",
                "onFocus",
                "level",
                "aria-label"
            ]
        );

        let kind = find(&attrs, "kind");
        assert_eq!(kind.primary_type(), AttributeType::Enum);
        assert_eq!(kind.enum_values, vec!["primary", "secondary", "tertiary"]);
        assert_eq!(kind.description.as_deref(), Some("Visual style of the button"));
        assert!(!kind.required);

        let size = find(&attrs, "size");
        assert_eq!(size.enum_values, vec!["sm", "md", "lg"]);

        let label = find(&attrs, "label");
        assert!(label.required);
        assert_eq!(label.types, vec![AttributeType::String]);

        assert!(find(&attrs, "busy").is_boolean());
        assert!(find(&attrs, "onClick").is_function());
        assert!(find(&attrs, "onFocus").is_function());

        let items = find(&attrs, "items");
        assert!(items.is_array());
        assert_eq!(items.item_type.as_deref(), Some("IMenuItem"));

        let level = find(&attrs, "level");
        assert_eq!(level.enum_values, vec!["1", "2", "3"]);
        assert!(level.has_type(AttributeType::Number));

        assert!(!find(&attrs, "aria-label").required);
    }

    #[test]
    fn test_multiline_union_member() {
        let scope = TypeScope::parse(
            "interface ITagProps {\n  color?:\n    | 'blue'\n    | 'red'\n  size?: string\n}",
        );
        let attrs = scope.props_attributes(None);
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].enum_values, vec!["blue", "red"]);
    }

    #[test]
    fn test_alias_props_with_omit() {
        let scope = TypeScope::parse(
            "interface IInner { a: string; b?: boolean; c: number }\n\
             export type ILinkProps = Omit<IInner, 'b'> & { href?: string };",
        );
        let attrs = scope.props_attributes(None);
        let names: Vec<&str> = attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "href"]);
    }

    #[test]
    fn test_member_names_for_item_type() {
        let scope = TypeScope::parse("interface IMenuItem { label: string; link?: string; active?: boolean }");
        assert_eq!(scope.member_names("IMenuItem"), vec!["label", "link", "active"]);
    }
}
