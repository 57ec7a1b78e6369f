//! Pure helpers: error message extraction (no HTTP).

use serde_json::Value;

/// Message used when an error body carries nothing readable.
pub(crate) const GENERIC_FAILURE: &str = "Request failed";

/// Pull a human-readable message out of an error body.
///
/// Known shapes, in order: `{"error": {"message": ..}}`, `{"message": ..}`,
/// `{"error": ".."}` (the guard worker's envelope).
pub(crate) fn extract_error_message(body: Option<&Value>) -> String {
    let Some(body) = body else {
        return GENERIC_FAILURE.to_string();
    };

    body.get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .or_else(|| body.get("message").and_then(Value::as_str))
        .or_else(|| body.get("error").and_then(Value::as_str))
        .filter(|m| !m.is_empty())
        .map(String::from)
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_error_message() {
        let body = json!({"error": {"message": "Neo.ClientError.Security.Unauthorized"}});
        assert_eq!(
            extract_error_message(Some(&body)),
            "Neo.ClientError.Security.Unauthorized"
        );
    }

    #[test]
    fn test_top_level_message() {
        let body = json!({"message": "bad gateway"});
        assert_eq!(extract_error_message(Some(&body)), "bad gateway");
    }

    #[test]
    fn test_worker_envelope() {
        let body = json!({"ok": false, "error": "Write/Procedure queries are not allowed"});
        assert_eq!(
            extract_error_message(Some(&body)),
            "Write/Procedure queries are not allowed"
        );
    }

    #[test]
    fn test_fallback() {
        assert_eq!(extract_error_message(None), GENERIC_FAILURE);
        assert_eq!(extract_error_message(Some(&json!({"error": 42}))), GENERIC_FAILURE);
        assert_eq!(extract_error_message(Some(&json!({"message": ""}))), GENERIC_FAILURE);
    }
}
