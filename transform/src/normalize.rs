//! Field normalization for the extractor's loosely-typed party fields.
//!
//! The upstream model sometimes serializes structured values as text, so a
//! field that should be a list can arrive as `"[\"a\", \"b\"]"` and an
//! object as `"{\"name\": ...}"`. All such coercion lives here; on any
//! nested parse failure the raw string is treated as an opaque name.

use serde_json::Value;

/// Whether a JSON value counts as "present and non-empty".
///
/// Null, `false`, zero, the empty string, and empty collections are all
/// treated as absent, matching how the extractor leaves fields blank.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// String rendering of a value: strings unquoted, everything else as JSON.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Coerce a field value into a list of values.
///
/// - absent/null: empty list
/// - list: passed through unchanged, elements not reinterpreted
/// - bracket-delimited string: parsed as a list when possible, otherwise
///   kept as a single opaque name
/// - other non-empty string: single-element list
/// - other scalar: single-element list of its string form
pub fn normalize_to_list(value: Option<&Value>) -> Vec<Value> {
    let Some(value) = value else {
        return Vec::new();
    };
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.clone(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(trimmed) {
                    return items;
                }
            }
            if s.is_empty() {
                Vec::new()
            } else {
                vec![Value::String(s.clone())]
            }
        }
        other => vec![Value::String(value_to_text(other))],
    }
}

/// Extract a display string from a possibly object-shaped value.
///
/// Objects prefer their `name` field, then `email`, then a JSON rendering
/// of the whole object. A brace-delimited string is parsed and given the
/// same treatment; when the parse fails the original string is returned
/// unchanged.
pub fn extract_display_value(value: Option<&Value>) -> Option<String> {
    let value = value?;
    match value {
        Value::Null => None,
        Value::Object(_) => Some(display_from_object(value)),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.starts_with('{') && trimmed.ends_with('}') {
                if let Ok(parsed) = serde_json::from_str::<Value>(trimmed) {
                    if parsed.is_object() {
                        return Some(display_from_object(&parsed));
                    }
                }
            }
            Some(s.clone())
        }
        other => Some(value_to_text(other)),
    }
}

fn display_from_object(value: &Value) -> String {
    let Value::Object(map) = value else {
        return value_to_text(value);
    };
    map.get("name")
        .filter(|v| is_truthy(v))
        .or_else(|| map.get("email").filter(|v| is_truthy(v)))
        .map(value_to_text)
        .unwrap_or_else(|| value.to_string())
}
