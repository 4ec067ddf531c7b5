//! Number validator with inclusive bounds

use crate::validators::*;
use regex::Regex;
use serde_json::{Number, Value};
use std::sync::LazyLock;
use tracing::debug;

/// Unsigned decimal: digits with an optional fractional part
static NUMERIC_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.?[0-9]*$").expect("numeric pattern is valid"));

fn number_mismatch() -> String {
    format!("{} \"number\"", TYPE_MISMATCH)
}

/// Parse numeric text, keeping integers integral
fn parse_numeric_text(text: &str) -> Option<Number> {
    if !NUMERIC_TEXT.is_match(text) {
        return None;
    }
    if !text.contains('.') {
        if let Ok(n) = text.parse::<u64>() {
            return Some(Number::from(n));
        }
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Accepts numbers and numeric strings within optional bounds
pub struct NumberValidator;

impl Validator for NumberValidator {
    fn validate(
        &self,
        config: &ValidationConfig,
        value: &Value,
        _inv: &Invocation<'_>,
    ) -> ValidationResponse {
        let parsed = match value {
            Value::Number(n) => n.clone(),
            Value::String(text) => match parse_numeric_text(text) {
                Some(n) => n,
                None => {
                    debug!(value = %text, "Rejected non-numeric text");
                    return ValidationResponse::invalid(
                        config.default_or(Value::from(0)),
                        number_mismatch(),
                    );
                }
            },
            _ => {
                return ValidationResponse::invalid(
                    config.default_or(Value::from(0)),
                    number_mismatch(),
                );
            }
        };

        let magnitude = parsed.as_f64().unwrap_or(f64::NAN);

        if let Some(min) = config.params.min.filter(|m| m.is_finite()) {
            if magnitude < min {
                return ValidationResponse::invalid(
                    Value::Number(parsed),
                    format!("Minimum allowed value: {} ", min),
                );
            }
        }

        if let Some(max) = config.params.max.filter(|m| m.is_finite()) {
            if magnitude > max {
                return ValidationResponse::invalid(
                    Value::Number(parsed),
                    format!("Maximum allowed value: {} ", max),
                );
            }
        }

        ValidationResponse::valid(Value::Number(parsed))
    }

    fn name(&self) -> &str {
        "number"
    }

    fn validation_type(&self) -> ValidationType {
        ValidationType::Number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn run(config: &ValidationConfig, value: Value) -> ValidationResponse {
        ValidatorRegistry::default().validate(config, &value, &ValidationContext::new())
    }

    fn number() -> ValidationConfig {
        ValidationConfig::new(ValidationType::Number)
    }

    fn parsed_f64(result: &ValidationResponse) -> f64 {
        result.parsed.as_json().and_then(Value::as_f64).unwrap()
    }

    #[test]
    fn test_numeric_string_coerced() {
        let result = run(&number(), json!("42"));
        assert!(result.is_valid);
        assert_eq!(result.parsed, Parsed::Json(json!(42)));

        let result = run(&number(), json!("3.25"));
        assert!(result.is_valid);
        assert_eq!(parsed_f64(&result), 3.25);
    }

    #[test]
    fn test_trailing_dot_accepted() {
        let result = run(&number(), json!("7."));
        assert!(result.is_valid);
        assert_eq!(parsed_f64(&result), 7.0);
    }

    #[test]
    fn test_signed_and_exponent_text_rejected() {
        for text in ["-1", "+1", "1e3", " 1", ".5", "abc", ""] {
            let result = run(&number().with_default(json!(9)), json!(text));
            assert!(!result.is_valid, "{text} should be rejected");
            assert_eq!(result.parsed, Parsed::Json(json!(9)));
        }
    }

    #[test]
    fn test_negative_number_value_accepted() {
        let result = run(&number(), json!(-4.5));
        assert!(result.is_valid);
        assert_eq!(result.parsed, Parsed::Json(json!(-4.5)));
    }

    #[test]
    fn test_non_numeric_kinds_rejected() {
        for value in [Value::Null, json!(true), json!([1]), json!({ "n": 1 })] {
            let result = run(&number(), value);
            assert!(!result.is_valid);
            assert_eq!(result.parsed, Parsed::Json(json!(0)));
            assert_eq!(result.message.as_deref(), Some("This value does not evaluate to type \"number\""));
        }
    }

    #[test]
    fn test_min_checked_before_max() {
        // inverted bounds cannot come from a checked schema, but dispatch does not check
        let config = number().with_min(10.0).with_max(1.0);
        let result = run(&config, json!(5));
        assert!(!result.is_valid);
        assert_eq!(result.message.as_deref(), Some("Minimum allowed value: 10 "));
        assert_eq!(result.parsed, Parsed::Json(json!(5)));
    }

    #[test]
    fn test_max_violation() {
        let result = run(&number().with_max(2.5), json!("3"));
        assert!(!result.is_valid);
        assert_eq!(result.message.as_deref(), Some("Maximum allowed value: 2.5 "));
        assert_eq!(result.parsed, Parsed::Json(json!(3)));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let config = number().with_min(1.0).with_max(3.0);
        assert!(run(&config, json!(1)).is_valid);
        assert!(run(&config, json!("3")).is_valid);
    }

    #[test]
    fn test_non_finite_bounds_ignored() {
        let config = number().with_min(f64::NEG_INFINITY).with_max(f64::INFINITY);
        assert!(run(&config, json!(1e300)).is_valid);
    }

    proptest! {
        #[test]
        fn prop_numeric_text_within_bounds_is_valid(n in 0u32..1_000_000, frac in 0u32..1000) {
            let text = format!("{}.{}", n, frac);
            let config = number().with_min(0.0).with_max(1_000_001.0);
            let result = run(&config, json!(text));
            prop_assert!(result.is_valid);
            prop_assert_eq!(parsed_f64(&result), text.parse::<f64>().unwrap());
        }

        #[test]
        fn prop_integer_text_parses_exactly(n in any::<u32>()) {
            let result = run(&number(), json!(n.to_string()));
            prop_assert!(result.is_valid);
            prop_assert_eq!(result.parsed, Parsed::Json(json!(n)));
        }
    }
}
