//! ISO-8601 date string validator
//!
//! Accepted strings are normalized: anything that parses but is not already
//! in a canonical form is re-rendered as UTC with millisecond precision.

use crate::validators::*;
use chrono::{
    DateTime, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone,
    Utc,
};
use serde_json::Value;
use tracing::debug;

/// Offset-aware layouts tried after RFC 3339
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];

/// Layouts without an offset; interpreted in local time
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

fn date_mismatch() -> String {
    format!("{}: Full ISO 8601 date string", TYPE_MISMATCH)
}

/// Now, in ISO-8601 with the local offset
fn now_local_iso() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Millis, false)
}

fn from_local(naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.fixed_offset()),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.fixed_offset()),
        LocalResult::None => None,
    }
}

/// Parse the date layouts accepted as ISO-8601 input
fn parse_date(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt);
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return from_local(naive);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).and_then(from_local);
    }
    DateTime::parse_from_rfc2822(text).ok()
}

/// Canonical UTC rendering: `YYYY-MM-DDTHH:MM:SS.sssZ`
fn canonical_utc(dt: &DateTime<FixedOffset>) -> String {
    dt.with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Canonical local rendering: `YYYY-MM-DDTHH:MM:SS.sss+HH:MM`
fn canonical_local(dt: &DateTime<FixedOffset>) -> String {
    dt.with_timezone(&Local)
        .to_rfc3339_opts(SecondsFormat::Millis, false)
}

/// Accepts parseable date strings and normalizes them to ISO-8601
pub struct DateIsoStringValidator;

impl Validator for DateIsoStringValidator {
    fn validate(
        &self,
        config: &ValidationConfig,
        value: &Value,
        _inv: &Invocation<'_>,
    ) -> ValidationResponse {
        let invalid = || {
            ValidationResponse::invalid(
                config.default_or(Value::String(now_local_iso())),
                date_mismatch(),
            )
        };

        let Value::String(text) = value else {
            return invalid();
        };

        let Some(dt) = parse_date(text) else {
            debug!(value = %text, "Unparseable date string");
            return invalid();
        };

        if *text == canonical_utc(&dt) || *text == canonical_local(&dt) {
            return ValidationResponse::valid(value.clone());
        }

        ValidationResponse::valid(Value::String(canonical_utc(&dt)))
    }

    fn name(&self) -> &str {
        "date_iso_string"
    }

    fn validation_type(&self) -> ValidationType {
        ValidationType::DateIsoString
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(value: Value) -> ValidationResponse {
        ValidatorRegistry::default().validate(
            &ValidationConfig::new(ValidationType::DateIsoString),
            &value,
            &ValidationContext::new(),
        )
    }

    fn parsed_text(result: &ValidationResponse) -> String {
        result.parsed.as_json().and_then(Value::as_str).unwrap().to_string()
    }

    #[test]
    fn test_canonical_utc_unchanged() {
        let result = run(json!("2024-03-01T12:30:00.000Z"));
        assert!(result.is_valid);
        assert_eq!(parsed_text(&result), "2024-03-01T12:30:00.000Z");
    }

    #[test]
    fn test_canonical_local_offset_unchanged() {
        let input = Local::now().to_rfc3339_opts(SecondsFormat::Millis, false);
        let result = run(json!(input.clone()));
        assert!(result.is_valid);
        assert_eq!(parsed_text(&result), input);
    }

    #[test]
    fn test_offset_string_normalized_to_utc() {
        let result = run(json!("2024-03-01T12:30:00+02:00"));
        assert!(result.is_valid);
        assert_eq!(parsed_text(&result), "2024-03-01T10:30:00.000Z");
    }

    #[test]
    fn test_missing_millis_normalized() {
        let result = run(json!("2024-03-01T12:30:00Z"));
        assert!(result.is_valid);
        assert_eq!(parsed_text(&result), "2024-03-01T12:30:00.000Z");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for input in ["2024-03-01", "2024-03-01T08:15", "2024-03-01T12:30:00.5+05:30"] {
            let first = run(json!(input));
            assert!(first.is_valid, "{input} should parse");
            let normalized = parsed_text(&first);
            assert!(normalized.ends_with('Z'));

            let second = run(json!(normalized.clone()));
            assert!(second.is_valid);
            assert_eq!(parsed_text(&second), normalized);
        }
    }

    #[test]
    fn test_invalid_inputs_fall_back_to_now() {
        for value in [Value::Null, json!(""), json!("not a date"), json!(20240301), json!("2024-13-45")] {
            let result = run(value);
            assert!(!result.is_valid);
            assert_eq!(
                result.message.as_deref(),
                Some("This value does not evaluate to type: Full ISO 8601 date string")
            );
            let fallback = parsed_text(&result);
            assert!(DateTime::parse_from_rfc3339(&fallback).is_ok());
        }
    }

    #[test]
    fn test_configured_default_used_on_failure() {
        let config = ValidationConfig::new(ValidationType::DateIsoString)
            .with_default(json!("2000-01-01T00:00:00.000Z"));
        let result =
            ValidatorRegistry::default().validate(&config, &json!(false), &ValidationContext::new());
        assert!(!result.is_valid);
        assert_eq!(result.parsed, Parsed::Json(json!("2000-01-01T00:00:00.000Z")));
    }
}
