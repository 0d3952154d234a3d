//! Payload validation for `pay_received` events.
//!
//! The body is decoded into a generic [`Value`] first, then checked field by
//! field. Check order is fixed: a payload that is wrong in several ways always
//! reports the first failing field.

use serde_json::{Map, Value};

use crate::models::{PaymentEvent, PAY_RECEIVED};

/// Validate a raw request body into a [`PaymentEvent`].
pub fn validate(bytes: &[u8]) -> Result<PaymentEvent, ValidationError> {
    // Number literals keep their text (arbitrary_precision), so `1e400`
    // decodes here and fails the amount check instead
    let value: Value =
        serde_json::from_slice(bytes).map_err(|_| ValidationError::InvalidEncoding)?;

    // A valid JSON document that is not an object has no `type` either
    let empty = Map::new();
    let obj = value.as_object().unwrap_or(&empty);

    if obj.get("type").and_then(Value::as_str) != Some(PAY_RECEIVED) {
        return Err(ValidationError::WrongType);
    }

    let payer = non_empty_str(obj, "payer").ok_or(ValidationError::InvalidPayer)?;

    let amount = obj
        .get("amount")
        .and_then(Value::as_f64)
        .filter(|a| a.is_finite())
        .ok_or(ValidationError::InvalidAmount)?;

    let ts = non_empty_str(obj, "ts").ok_or(ValidationError::InvalidTimestamp)?;

    let raw = match obj.get("raw") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err(ValidationError::InvalidRaw),
    };

    Ok(PaymentEvent {
        payer: payer.to_string(),
        amount,
        ts: ts.to_string(),
        raw,
    })
}

fn non_empty_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Reasons a payload is rejected. All map to HTTP 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    InvalidEncoding,
    WrongType,
    InvalidPayer,
    InvalidAmount,
    InvalidTimestamp,
    InvalidRaw,
}

impl ValidationError {
    /// Machine-stable message returned to the sender
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidEncoding => "Invalid JSON",
            Self::WrongType => "type must be pay_received",
            Self::InvalidPayer => "payer must be string",
            Self::InvalidAmount => "amount must be number",
            Self::InvalidTimestamp => "ts must be string",
            Self::InvalidRaw => "raw must be string",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(body: &str) -> Result<PaymentEvent, ValidationError> {
        validate(body.as_bytes())
    }

    #[test]
    fn test_valid_event() {
        let event = check(
            r#"{"type":"pay_received","payer":"Bob","amount":10,"ts":"2024-01-01T00:00:00Z","raw":"Bob paid you $10"}"#,
        )
        .unwrap();

        assert_eq!(event.payer, "Bob");
        assert_eq!(event.amount, 10.0);
        assert_eq!(event.ts, "2024-01-01T00:00:00Z");
        assert_eq!(event.raw, "Bob paid you $10");
    }

    #[test]
    fn test_raw_defaults_to_empty() {
        let event = check(r#"{"type":"pay_received","payer":"a","amount":1,"ts":"t"}"#).unwrap();
        assert_eq!(event.raw, "");

        let event =
            check(r#"{"type":"pay_received","payer":"a","amount":1,"ts":"t","raw":null}"#)
                .unwrap();
        assert_eq!(event.raw, "");
    }

    #[test]
    fn test_negative_and_fractional_amounts() {
        let event = check(r#"{"type":"pay_received","payer":"a","amount":-2.5,"ts":"t"}"#).unwrap();
        assert_eq!(event.amount, -2.5);
    }

    #[test]
    fn test_invalid_encoding() {
        assert_eq!(check("not json"), Err(ValidationError::InvalidEncoding));
        assert_eq!(check(""), Err(ValidationError::InvalidEncoding));
        assert_eq!(
            validate(&[0xff, 0xfe, 0x00]),
            Err(ValidationError::InvalidEncoding)
        );
    }

    #[test]
    fn test_wrong_type_reported_first() {
        assert_eq!(check(r#"{"type":"x"}"#), Err(ValidationError::WrongType));
        assert_eq!(check(r#"{}"#), Err(ValidationError::WrongType));
        assert_eq!(check(r#"[1,2]"#), Err(ValidationError::WrongType));
        assert_eq!(check("null"), Err(ValidationError::WrongType));
        assert_eq!(
            check(r#"{"type":"PAY_RECEIVED","payer":"a","amount":1,"ts":"t"}"#),
            Err(ValidationError::WrongType)
        );
    }

    #[test]
    fn test_check_order() {
        assert_eq!(
            check(r#"{"type":"pay_received","payer":"","amount":"x","ts":""}"#),
            Err(ValidationError::InvalidPayer)
        );
        assert_eq!(
            check(r#"{"type":"pay_received","payer":"a","amount":"10","ts":""}"#),
            Err(ValidationError::InvalidAmount)
        );
        assert_eq!(
            check(r#"{"type":"pay_received","payer":"a","amount":10}"#),
            Err(ValidationError::InvalidTimestamp)
        );
        assert_eq!(
            check(r#"{"type":"pay_received","payer":"a","amount":10,"ts":"t","raw":5}"#),
            Err(ValidationError::InvalidRaw)
        );
    }

    #[test]
    fn test_non_string_payer_rejected() {
        assert_eq!(
            check(r#"{"type":"pay_received","payer":42,"amount":1,"ts":"t"}"#),
            Err(ValidationError::InvalidPayer)
        );
    }

    #[test]
    fn test_non_numeric_amount_rejected() {
        for amount in [r#""5""#, "null", "true", "[]", "{}"] {
            let body = format!(
                r#"{{"type":"pay_received","payer":"a","amount":{},"ts":"t"}}"#,
                amount
            );
            assert_eq!(check(&body), Err(ValidationError::InvalidAmount), "{}", amount);
        }
    }

    #[test]
    fn test_overflowing_amount_is_not_finite() {
        for amount in ["1e400", "-1e400"] {
            let body = format!(
                r#"{{"type":"pay_received","payer":"a","amount":{},"ts":"t"}}"#,
                amount
            );
            assert_eq!(check(&body), Err(ValidationError::InvalidAmount), "{}", amount);
        }
    }

    #[test]
    fn test_overflowing_amount_keeps_check_order() {
        assert_eq!(
            check(r#"{"type":"x","amount":1e400}"#),
            Err(ValidationError::WrongType)
        );
        assert_eq!(
            check(r#"{"type":"pay_received","payer":"","amount":1e400,"ts":"t"}"#),
            Err(ValidationError::InvalidPayer)
        );
    }

    #[test]
    fn test_large_finite_amount_accepted() {
        let event = check(r#"{"type":"pay_received","payer":"a","amount":1e300,"ts":"t"}"#).unwrap();
        assert_eq!(event.amount, 1e300);
    }

    #[test]
    fn test_messages() {
        assert_eq!(ValidationError::InvalidEncoding.to_string(), "Invalid JSON");
        assert_eq!(
            ValidationError::WrongType.to_string(),
            "type must be pay_received"
        );
        assert_eq!(ValidationError::InvalidAmount.message(), "amount must be number");
    }
}
