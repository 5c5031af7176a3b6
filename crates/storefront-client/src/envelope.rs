//! Response envelope classification and payload normalization
//!
//! The storefront backend wraps payloads in one of two shapes:
//!
//! - standard: `{ "success": bool, "message"?, "code"?, "skipToast"?, "data"? }`
//! - legacy: `{ "rc" | "code", "message"?, "rs"? }`, where any code other than
//!   the configured sentinel is an error
//!
//! Bodies matching neither are passed through untouched.

use serde_json::{Map, Value};

/// Classified response body
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// Object carrying a `success` field
    Standard(StandardEnvelope),
    /// Object carrying `rc` or `code` but no `success`
    Legacy(LegacyEnvelope),
    /// Anything else
    Raw,
}

/// `{ success, message, code, skipToast }` envelope
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StandardEnvelope {
    /// False only when the body says `"success": false` literally
    pub success: bool,
    pub message: Option<String>,
    pub code: Option<String>,
    pub skip_toast: bool,
}

/// `{ rc | code, message }` envelope
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyEnvelope {
    pub code: String,
    pub message: Option<String>,
}

impl LegacyEnvelope {
    /// Whether the code equals the success sentinel
    pub fn is_ok(&self, ok_code: &str) -> bool {
        self.code == ok_code
    }
}

impl Envelope {
    /// Resolve the envelope shape of a response body
    pub fn classify(body: &Value) -> Self {
        let Some(obj) = body.as_object() else {
            return Self::Raw;
        };

        if let Some(success) = obj.get("success") {
            return Self::Standard(StandardEnvelope {
                success: success != &Value::Bool(false),
                message: message_of(obj),
                code: obj.get("code").and_then(server_code),
                skip_toast: obj.get("skipToast").map(is_truthy).unwrap_or(false),
            });
        }

        match obj.get("rc").or_else(|| obj.get("code")).and_then(server_code) {
            Some(code) => Self::Legacy(LegacyEnvelope {
                code,
                message: message_of(obj),
            }),
            None => Self::Raw,
        }
    }

    /// Payload a caller is usually interested in: `data` for standard
    /// envelopes, `rs` for legacy ones, the whole body otherwise.
    pub fn payload(body: &Value) -> &Value {
        let key = match Self::classify(body) {
            Self::Standard(_) => "data",
            Self::Legacy(_) => "rs",
            Self::Raw => return body,
        };
        body.get(key).unwrap_or(body)
    }
}

/// Render a server-reported code as text; null and empty codes count as absent.
pub fn server_code(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Human-readable message field of an envelope object
pub fn message_of(obj: &Map<String, Value>) -> Option<String> {
    match obj.get("message")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Null => None,
        Value::String(_) => None,
        other => Some(other.to_string()),
    }
}

// Loose truthiness, since older endpoints send `1`/`"true"` for flags.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty() && s != "false" && s != "0",
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Replace every string value `"null"` in the tree with JSON null.
///
/// Object keys are left alone. Applying it twice is the same as applying it once.
pub fn normalize_null_strings(value: &mut Value) {
    match value {
        Value::String(s) if s == "null" => *value = Value::Null,
        Value::Array(items) => items.iter_mut().for_each(normalize_null_strings),
        Value::Object(map) => map.values_mut().for_each(normalize_null_strings),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_standard_failure() {
        let body = json!({ "success": false, "message": "Out of stock", "code": 40 });
        assert_eq!(
            Envelope::classify(&body),
            Envelope::Standard(StandardEnvelope {
                success: false,
                message: Some("Out of stock".into()),
                code: Some("40".into()),
                skip_toast: false,
            })
        );
    }

    #[test]
    fn test_only_literal_false_marks_failure() {
        for flag in [json!(null), json!(0), json!(""), json!("false"), json!(true)] {
            let body = json!({ "success": flag, "data": { "id": 1 } });
            let Envelope::Standard(env) = Envelope::classify(&body) else {
                panic!("expected standard envelope for {flag}");
            };
            assert!(env.success, "success: {flag} should not be a failure");
        }
    }

    #[test]
    fn test_classify_standard_takes_priority_over_legacy_code() {
        let body = json!({ "success": true, "rc": 12, "skipToast": true });
        match Envelope::classify(&body) {
            Envelope::Standard(env) => {
                assert!(env.success);
                assert!(env.skip_toast);
                assert_eq!(env.code, None);
            }
            other => panic!("expected standard envelope, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_legacy_prefers_rc() {
        let body = json!({ "rc": "E12", "code": 7, "message": "Invalid session" });
        assert_eq!(
            Envelope::classify(&body),
            Envelope::Legacy(LegacyEnvelope {
                code: "E12".into(),
                message: Some("Invalid session".into()),
            })
        );
    }

    #[test]
    fn test_classify_raw_bodies() {
        assert_eq!(Envelope::classify(&json!([1, 2, 3])), Envelope::Raw);
        assert_eq!(Envelope::classify(&json!("plain")), Envelope::Raw);
        assert_eq!(Envelope::classify(&json!({ "items": [] })), Envelope::Raw);
        assert_eq!(Envelope::classify(&json!({ "code": null })), Envelope::Raw);
    }

    #[test]
    fn test_legacy_sentinel() {
        let Envelope::Legacy(env) = Envelope::classify(&json!({ "rc": 0, "rs": {} })) else {
            panic!("expected legacy envelope");
        };
        assert!(env.is_ok("0"));
        assert!(!env.is_ok("200"));
    }

    #[test]
    fn test_payload_selection() {
        let standard = json!({ "success": true, "data": { "id": 1 } });
        assert_eq!(Envelope::payload(&standard), &json!({ "id": 1 }));

        let legacy = json!({ "rc": 0, "rs": [1] });
        assert_eq!(Envelope::payload(&legacy), &json!([1]));

        let raw = json!({ "id": 2 });
        assert_eq!(Envelope::payload(&raw), &raw);
    }

    #[test]
    fn test_normalize_null_strings_nested() {
        let mut body = json!({
            "name": "null",
            "note": "nullable",
            "null": "kept key",
            "items": [{ "sku": "null" }, "null", 3],
        });
        normalize_null_strings(&mut body);
        assert_eq!(
            body,
            json!({
                "name": null,
                "note": "nullable",
                "null": "kept key",
                "items": [{ "sku": null }, null, 3],
            })
        );
    }

    #[test]
    fn test_normalize_null_strings_is_idempotent() {
        let mut once = json!({ "a": ["null", { "b": "null", "c": "NULL" }] });
        normalize_null_strings(&mut once);
        let mut twice = once.clone();
        normalize_null_strings(&mut twice);
        assert_eq!(once, twice);
        assert_eq!(once["a"][1]["c"], json!("NULL"));
    }
}
