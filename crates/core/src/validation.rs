//! Presence check for inbound event bodies.
//!
//! The relay does not interpret payloads. It only insists that a body is a
//! non-empty JSON object before anything is forwarded.

use serde_json::{Map, Value};

use crate::error::ValidationError;

/// Parse and check an inbound body, returning the object exactly as sent.
pub fn validate_payload(body: &[u8]) -> Result<Map<String, Value>, ValidationError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ValidationError::Missing);
    }

    match serde_json::from_slice::<Value>(body)? {
        Value::Object(map) if map.is_empty() => Err(ValidationError::Empty),
        Value::Object(map) => Ok(map),
        other => Err(ValidationError::NotAnObject(json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn accepts_non_empty_object() {
        let map = validate_payload(br#"{"node": "n1"}"#).unwrap();

        assert_eq!(Value::Object(map), json!({"node": "n1"}));
    }

    #[test]
    fn keeps_key_order_as_sent() {
        let map = validate_payload(br#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();

        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn empty_body_is_missing() {
        assert_matches!(validate_payload(b""), Err(ValidationError::Missing));
        assert_matches!(validate_payload(b" \n\t"), Err(ValidationError::Missing));
    }

    #[test]
    fn empty_object_is_rejected() {
        assert_matches!(validate_payload(b"{}"), Err(ValidationError::Empty));
        assert_matches!(validate_payload(b"  { }  "), Err(ValidationError::Empty));
    }

    #[test]
    fn garbage_is_malformed() {
        assert_matches!(validate_payload(b"node=n1"), Err(ValidationError::Malformed(_)));
        assert_matches!(validate_payload(br#"{"node": "#), Err(ValidationError::Malformed(_)));
    }

    #[test]
    fn non_object_json_is_rejected() {
        assert_matches!(validate_payload(b"null"), Err(ValidationError::NotAnObject("null")));
        assert_matches!(validate_payload(b"[1, 2]"), Err(ValidationError::NotAnObject("an array")));
        assert_matches!(validate_payload(b"\"hi\""), Err(ValidationError::NotAnObject("a string")));
        assert_matches!(validate_payload(b"42"), Err(ValidationError::NotAnObject("a number")));
    }
}
