// Response envelope handling.
//
// The API wraps payloads as `{"data": ...}` but not consistently, so every
// caller falls back to the raw body.

use serde_json::Value;

/// Payload of a single-object response: `data` if present, else the body
pub fn payload(body: &Value) -> &Value {
    match body.get("data") {
        Some(data) if !data.is_null() => data,
        _ => body,
    }
}

/// Items of a collection response. Anything that is not an array yields
/// an empty list.
pub fn items(body: &Value) -> Vec<Value> {
    match payload(body) {
        Value::Array(items) => items.clone(),
        _ => Vec::new(),
    }
}

/// Whether a detail payload carries anything worth rendering
pub fn is_present(payload: &Value) -> bool {
    match payload {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_prefers_data() {
        assert_eq!(payload(&json!({"data": {"id": 1}})), &json!({"id": 1}));
        assert_eq!(payload(&json!({"id": 1})), &json!({"id": 1}));
        assert_eq!(payload(&json!({"data": null, "id": 2})), &json!({"data": null, "id": 2}));
    }

    #[test]
    fn test_items_fallbacks() {
        assert_eq!(items(&json!({"data": [1, 2]})).len(), 2);
        assert_eq!(items(&json!([1, 2, 3])).len(), 3);
        assert!(items(&json!({"data": {"id": 1}})).is_empty());
        assert!(items(&Value::Null).is_empty());
    }

    #[test]
    fn test_is_present() {
        assert!(!is_present(&Value::Null));
        assert!(!is_present(&json!({})));
        assert!(is_present(&json!({"id": "x"})));
    }
}
