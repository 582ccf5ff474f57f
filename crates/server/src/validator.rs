//! Field checks for untyped request bodies.
//!
//! Create requests arrive as a flat JSON object whose values are read as
//! strings, so `"walletId": "1"` and `"walletId": 1` are equivalent.

use serde_json::{Map, Value};

use crate::ServerError;

/// An untyped JSON request body.
pub type Payload = Map<String, Value>;

/// Fails if any of `required` is absent, `null` or blank.
///
/// The error names every missing key, in the order given.
pub fn validate(payload: &Payload, required: &[&str]) -> Result<(), ServerError> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|key| is_missing(payload.get(*key)))
        .collect();

    if missing.is_empty() {
        return Ok(());
    }
    Err(ServerError::Validation(format!(
        "missing required fields: {}",
        missing.join(", ")
    )))
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Returns the value of `key` as a string, `None` if absent or `null`.
///
/// Objects and arrays are rejected.
pub fn text(payload: &Payload, key: &str) -> Result<Option<String>, ServerError> {
    match payload.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) => Err(ServerError::Validation(format!(
            "{key} must be a string or a number"
        ))),
    }
}

/// Like [`text`], but a missing value is a validation error.
pub fn required_text(payload: &Payload, key: &str) -> Result<String, ServerError> {
    text(payload, key)?
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ServerError::Validation(format!("missing required fields: {key}")))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn payload(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            _ => panic!("test payload must be an object"),
        }
    }

    fn message(err: ServerError) -> String {
        match err {
            ServerError::Validation(msg) => msg,
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn all_present_passes() {
        let body = payload(json!({"globalId": "g-1", "walletId": 1}));
        assert!(validate(&body, &["globalId", "walletId"]).is_ok());
    }

    #[test]
    fn lists_every_missing_key() {
        let body = payload(json!({"globalId": "  ", "currency": null, "amount": "10"}));
        let err = validate(&body, &["globalId", "currency", "walletId", "amount"]).unwrap_err();
        assert_eq!(
            message(err),
            "missing required fields: globalId, currency, walletId"
        );
    }

    #[test]
    fn numbers_are_read_as_strings() {
        let body = payload(json!({"walletId": 12, "amount": 10.5}));
        assert_eq!(text(&body, "walletId").unwrap(), Some("12".to_string()));
        assert_eq!(text(&body, "amount").unwrap(), Some("10.5".to_string()));
        assert_eq!(text(&body, "description").unwrap(), None);
    }

    #[test]
    fn nested_values_are_rejected() {
        let body = payload(json!({"walletId": {"id": 1}}));
        assert_eq!(
            message(text(&body, "walletId").unwrap_err()),
            "walletId must be a string or a number"
        );
    }

    #[test]
    fn blank_required_text_is_missing() {
        let body = payload(json!({"globalId": ""}));
        assert_eq!(
            message(required_text(&body, "globalId").unwrap_err()),
            "missing required fields: globalId"
        );
    }
}
