use serde_json::Value;

/// Parse JSON text into a value.
///
/// Malformed input is a normal outcome, not a fault: the error string is shown
/// in the editor status area and the app keeps running on the last good value.
pub(crate) fn parse_json_text(text: &str) -> Result<Value, String> {
    serde_json::from_str::<Value>(text).map_err(|e| e.to_string())
}

/// Canonical serialization: 2-space indent, object keys in the value's own
/// iteration order, array elements in order. Same value, same text.
pub(crate) fn pretty_json(value: &Value) -> String {
    // Serializing a `Value` cannot produce invalid data; the fallback is never hit.
    serde_json::to_string_pretty(value).unwrap_or_default()
}
