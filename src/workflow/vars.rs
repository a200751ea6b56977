//! `${...}` variable expansion against interpreter scope and actor
//! KV-State (spec §3 "Transition", §4.6 step 2a, §6 "Variable expansion
//! syntax").

// Layer 1: Standard library imports
use std::collections::HashMap;

// Layer 2: Third-party crate imports
use serde_json::Value as JsonValue;

// Layer 3: Internal module imports
use crate::kv::KvHandle;

/// Expand every `${...}` reference found in `template` against `variables`
/// first, then `kv` (optionally `json.`-prefixed), then the reference's own
/// `:-default` fallback, leaving genuinely unresolved references untouched
/// (spec §6 "Resolution order").
pub fn expand_str(template: &str, variables: &HashMap<String, String>, kv: &KvHandle) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let expr = &after[..end];
                out.push_str(&resolve(expr, variables, kv));
                rest = &after[end + 1..];
            }
            None => {
                // No closing brace: not a well-formed reference, emit the
                // rest literally (spec §6 "Unresolved references are left
                // literally").
                out.push_str(&rest[start..]);
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Recursively expand every string leaf of a [`JsonValue`], leaving
/// structure (arrays/objects/numbers/bools/null) untouched.
pub fn expand_value(value: &JsonValue, variables: &HashMap<String, String>, kv: &KvHandle) -> JsonValue {
    match value {
        JsonValue::String(s) => JsonValue::String(expand_str(s, variables, kv)),
        JsonValue::Array(items) => {
            JsonValue::Array(items.iter().map(|v| expand_value(v, variables, kv)).collect())
        }
        JsonValue::Object(map) => JsonValue::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), expand_value(v, variables, kv)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn resolve(expr: &str, variables: &HashMap<String, String>, kv: &KvHandle) -> String {
    let (name, default) = match expr.split_once(":-") {
        Some((name, default)) => (name, Some(default)),
        None => (expr, None),
    };

    if let Some(value) = variables.get(name) {
        return value.clone();
    }

    let path = name.strip_prefix("json.").unwrap_or(name);
    if kv.has(path) {
        return kv.get_string(path, "");
    }

    match default {
        Some(default) => default.to_string(),
        None => format!("${{{expr}}}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn expands_plain_variable() {
        let vars = HashMap::from([("name".to_string(), "Alice".to_string())]);
        let kv = KvHandle::new();
        assert_eq!(expand_str("hello ${name}", &vars, &kv), "hello Alice");
    }

    #[test]
    fn expands_json_prefixed_actor_state() {
        let vars = HashMap::new();
        let kv = KvHandle::new();
        kv.put("workflow.retry", 3).unwrap();
        assert_eq!(expand_str("${json.workflow.retry}", &vars, &kv), "3");
    }

    #[test]
    fn falls_back_to_default_form() {
        let vars = HashMap::new();
        let kv = KvHandle::new();
        assert_eq!(expand_str("${missing:-fallback}", &vars, &kv), "fallback");
    }

    #[test]
    fn unresolved_reference_is_left_literal() {
        let vars = HashMap::new();
        let kv = KvHandle::new();
        assert_eq!(expand_str("${totally.missing}", &vars, &kv), "${totally.missing}");
    }

    #[test]
    fn variables_take_priority_over_kv_state() {
        let vars = HashMap::from([("name".to_string(), "from-var".to_string())]);
        let kv = KvHandle::new();
        kv.put("name", "from-kv").unwrap();
        assert_eq!(expand_str("${name}", &vars, &kv), "from-var");
    }

    #[test]
    fn expands_every_string_leaf_of_a_mapping() {
        let vars = HashMap::from([("name".to_string(), "Alice".to_string())]);
        let kv = KvHandle::new();
        let value = serde_json::json!({"greeting": "hi ${name}", "n": 3});
        let expanded = expand_value(&value, &vars, &kv);
        assert_eq!(expanded, serde_json::json!({"greeting": "hi Alice", "n": 3}));
    }
}
