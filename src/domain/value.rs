//! Helpers for reading the untyped stored-value tree.

use serde_json::Value;

/// Treat JSON `null` the same as an absent value.
pub fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Element `index` of a stored sequence, if the value is a sequence that long.
pub fn element(value: Option<&Value>, index: usize) -> Option<&Value> {
    present(value)
        .and_then(Value::as_array)
        .and_then(|items| items.get(index))
        .filter(|v| !v.is_null())
}

/// Number of elements in a stored sequence; zero for anything else.
pub fn sequence_len(value: Option<&Value>) -> usize {
    present(value)
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0)
}

/// Text shown in a text input or compared against choice keys.
pub fn display_text(value: Option<&Value>) -> String {
    match present(value) {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Loose truthiness used for checkbox state.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match present(value) {
        None => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}
