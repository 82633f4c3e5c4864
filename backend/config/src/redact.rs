//! Config redaction: produce safe-to-log config snapshots by masking secrets.

use serde_json::Value;

/// Keys whose string values are secrets.
static SENSITIVE_KEYS: &[&str] = &[
    "accessToken",
    "access_token",
    "apiKey",
    "api_key",
    "token",
    "secret",
    "password",
    "privateKey",
    "private_key",
];

/// Redact a config JSON value, masking every sensitive field.
///
/// The first four characters are kept as a hint (`ya29***`).
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_string(s: &str, key: &str) -> Value {
    if !is_sensitive_key(key) || s.is_empty() {
        return Value::String(s.to_string());
    }
    let hint: String = if s.chars().count() > 8 {
        s.chars().take(4).collect()
    } else {
        String::new()
    };
    Value::String(format!("{hint}***"))
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) => redact_string(s, key),
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                result.insert(k.clone(), redact_recursive(v, k));
            }
            Value::Object(result)
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redacts_access_token() {
        let v = json!({ "auth": { "mode": "static", "accessToken": "ya29.a0AfH6SMBexample" } });
        let redacted = redact(&v);
        let token = redacted["auth"]["accessToken"].as_str().unwrap();
        assert_eq!(token, "ya29***");
        assert_eq!(redacted["auth"]["mode"], "static");
    }

    #[test]
    fn short_secrets_get_no_hint() {
        let redacted = redact(&json!({ "token": "abc" }));
        assert_eq!(redacted["token"], "***");
    }

    #[test]
    fn passthrough_non_sensitive() {
        let v = json!({ "resultBucket": "ocr-results", "logging": { "level": "debug" } });
        assert_eq!(redact(&v), v);
    }
}
