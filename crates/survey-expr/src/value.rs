//! Answer values as seen by runners and questions.

use std::collections::BTreeMap;

use serde_json::Value;

/// Flat mapping of answer names to values, as handed to condition runners.
pub type ValueMap = BTreeMap<String, Value>;

/// Return true when `value` carries no answer.
///
/// Null, blank strings, empty arrays and empty objects are empty. `0` and `false` are answers.
pub fn is_value_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Resolve `name` in `values`.
///
/// An exact key wins. Otherwise the name is treated as a dotted path: the first segment selects
/// an answer, later segments index into objects (by key) or arrays (by position).
pub fn lookup<'a>(values: &'a ValueMap, name: &str) -> Option<&'a Value> {
    if let Some(found) = values.get(name) {
        return Some(found);
    }
    let mut parts = name.split('.');
    let mut current = values.get(parts.next()?)?;
    for part in parts {
        current = match current {
            Value::Object(map) => map.get(part)?,
            Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Render a value for text substitution: strings verbatim, null as nothing, the rest as JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
