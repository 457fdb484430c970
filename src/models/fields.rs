// Field normalization helpers shared by every entity mapping.
//
// The API is inconsistent about key names (`job_id` vs `patch_id` vs `id`,
// `nama_aset` vs `name`, ...). Each entity's `from_json` lists its candidate
// keys in priority order and these helpers pick the first usable value.
// Empty strings and `null` count as absent.

use serde_json::Value;

/// First non-empty string among `keys`. Numbers are rendered as strings so
/// numeric identifiers survive.
pub fn pick_str(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get(*key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Like `pick_str` but only accepts JSON strings.
pub fn pick_strict_str(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get(*key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    })
}

/// First non-empty string, or `default` when every key is absent.
pub fn str_or(value: &Value, keys: &[&str], default: &str) -> String {
    pick_str(value, keys).unwrap_or_else(|| default.to_string())
}

/// First numeric value among `keys`. Numeric strings are accepted.
pub fn pick_f64(value: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| match value.get(*key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Integer counter; anything unusable becomes 0.
pub fn count(value: &Value, key: &str) -> i64 {
    match value.get(key) {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    }
}

/// Array under `key`, or an empty slice.
pub fn array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value.get(key).and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}
