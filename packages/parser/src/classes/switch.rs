use super::{strip_props_prefix, PropClassLookup};
use crate::ast::{ClassMapping, Prop, PropValue, SwitchCase, SwitchMapping, Trigger};
use crate::scan::{extract_balanced_inner, literal_value, string_literal};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

static SWITCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:let|var)\s+([A-Za-z_$][\w$]*)\s*(?::[^=;]+)?(?:=\s*[^;]+)?;\s*switch\s*\(\s*([\w$.]+)\s*\)\s*\{",
    )
    .unwrap()
});

const CASE_VALUE: &str = r#"'[^']*'|"[^"]*"|[\w$.-]+"#;

/// Every `let r; switch (v) { case ...: r = ...; }` block in `text`.
pub fn extract_switches(text: &str) -> Vec<SwitchMapping> {
    let mut switches = Vec::new();

    for caps in SWITCH_RE.captures_iter(text) {
        let (Some(whole), Some(result), Some(var)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let Some(body) = extract_balanced_inner(text, whole.end() - 1) else {
            continue;
        };
        let result_var = result.as_str();
        let switch_var = strip_props_prefix(var.as_str());

        let Some(switch) = parse_cases(body, result_var, &switch_var) else {
            continue;
        };
        debug!(
            switch_var = %switch.switch_var,
            result_var = %switch.result_var,
            cases = switch.cases.len(),
            has_default = switch.default.is_some(),
            "found switch mapping"
        );
        switches.push(switch);
    }

    switches
}

fn parse_cases(body: &str, result_var: &str, switch_var: &str) -> Option<SwitchMapping> {
    let pattern = format!(
        r"\bcase\s+({v})\s*:|\bdefault\s*:|\b{r}\s*=\s*({v})",
        v = CASE_VALUE,
        r = regex::escape(result_var),
    );
    let re = Regex::new(&pattern).ok()?;

    let mut cases = Vec::new();
    let mut pending: Vec<Value> = Vec::new();
    let mut in_default = false;
    let mut default = None;

    for caps in re.captures_iter(body) {
        if let Some(value) = caps.get(1) {
            pending.push(literal_value(value.as_str()));
        } else if let Some(result) = caps.get(2) {
            let result = unquote(result.as_str());
            if in_default {
                // Only the first default counts
                default.get_or_insert_with(|| result.clone());
            }
            if !pending.is_empty() {
                cases.push(SwitchCase {
                    values: std::mem::take(&mut pending),
                    result,
                });
            }
            in_default = false;
        } else {
            in_default = true;
        }
    }

    if cases.is_empty() && default.is_none() {
        return None;
    }
    Some(SwitchMapping {
        switch_var: switch_var.to_string(),
        result_var: result_var.to_string(),
        cases,
        default,
    })
}

fn unquote(value: &str) -> String {
    string_literal(value).unwrap_or_else(|| value.to_string())
}

/// Project a switch onto class mappings.
///
/// The result variable is either forwarded to a base-component prop
/// (`appearance={appearance}`), in which case each result is resolved
/// through `lookup`, or used as a class directly inside `class_expr`.
///
/// All mappings share one chain named after the result variable. A case
/// whose result adds no class still gets an (empty) arm, so only values
/// no case lists fall through to the default.
pub fn switch_class_mappings(
    switch: &SwitchMapping,
    root_props: &[Prop],
    class_expr: Option<&str>,
    lookup: &dyn PropClassLookup,
    base_classes: &[String],
) -> Vec<ClassMapping> {
    let target = root_props.iter().find(|p| {
        matches!(&p.value, PropValue::Expression(e) if e.trim() == switch.result_var)
    });
    let used_as_class = class_expr.map_or(false, |expr| {
        Regex::new(&format!(r"\b{}\b", regex::escape(&switch.result_var)))
            .map(|re| re.is_match(expr))
            .unwrap_or(false)
    });

    let classes_of = |result: &str| -> Vec<String> {
        if matches!(result, "" | "undefined" | "null") {
            return Vec::new();
        }
        let classes = match target {
            Some(prop) => lookup.classes_for(&prop.name, &Value::String(result.to_string())),
            None if used_as_class => result.split_whitespace().map(str::to_string).collect(),
            None => Vec::new(),
        };
        classes
            .into_iter()
            .filter(|c| !base_classes.contains(c))
            .collect()
    };

    let mut arms: Vec<(Trigger, Vec<String>, String)> = Vec::new();
    let mut seen: Vec<&Value> = Vec::new();
    for case in &switch.cases {
        let classes = classes_of(&case.result);
        for value in &case.values {
            // A repeated label never matches again
            if seen.contains(&value) {
                continue;
            }
            seen.push(value);
            arms.push((
                Trigger::Equals(value.clone()),
                classes.clone(),
                format!("{} === {}", switch.switch_var, js_literal(value)),
            ));
        }
    }
    if let Some(default) = &switch.default {
        let classes = classes_of(default);
        if !classes.is_empty() {
            arms.push((Trigger::Otherwise, classes, format!("default → {}", default)));
        }
    }
    if arms.iter().all(|(_, classes, _)| classes.is_empty()) {
        return Vec::new();
    }

    let chain = format!("switch:{}", switch.result_var);
    let mut mappings = Vec::new();
    for (trigger, classes, condition) in arms {
        let mapping = |class: &str| {
            ClassMapping::new(switch.switch_var.clone(), trigger.clone(), class, condition.clone())
                .in_chain(chain.clone())
        };
        if classes.is_empty() {
            mappings.push(mapping(""));
        }
        mappings.extend(classes.iter().map(|class| mapping(class)));
    }
    mappings
}

fn js_literal(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s),
        other => other.to_string(),
    }
}
