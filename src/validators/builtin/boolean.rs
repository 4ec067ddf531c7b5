//! Boolean validator

use crate::validators::value::is_absent;
use crate::validators::*;
use serde_json::Value;

fn boolean_mismatch() -> String {
    format!("{} \"boolean\"", TYPE_MISMATCH)
}

/// Accepts booleans and the strings "true" / "false"
pub struct BooleanValidator;

impl Validator for BooleanValidator {
    fn validate(
        &self,
        config: &ValidationConfig,
        value: &Value,
        _inv: &Invocation<'_>,
    ) -> ValidationResponse {
        if is_absent(value) {
            if config.is_required() {
                return ValidationResponse::invalid(
                    config.default_or(Value::Bool(false)),
                    boolean_mismatch(),
                );
            }
            return ValidationResponse::valid(config.default_or(value.clone()));
        }

        match value {
            Value::Bool(b) => ValidationResponse::valid(Value::Bool(*b)),
            Value::String(s) if s == "true" => ValidationResponse::valid(Value::Bool(true)),
            Value::String(s) if s == "false" => ValidationResponse::valid(Value::Bool(false)),
            _ => ValidationResponse::invalid(config.default_or(value.clone()), boolean_mismatch()),
        }
    }

    fn name(&self) -> &str {
        "boolean"
    }

    fn validation_type(&self) -> ValidationType {
        ValidationType::Boolean
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

    fn boolean() -> ValidationConfig {
        ValidationConfig::new(ValidationType::Boolean)
    }

    #[test]
    fn test_string_literals_coerced() {
        let result = run(&boolean(), json!("true"));
        assert!(result.is_valid);
        assert_eq!(result.parsed, Parsed::Json(json!(true)));

        let result = run(&boolean(), json!("false"));
        assert!(result.is_valid);
        assert_eq!(result.parsed, Parsed::Json(json!(false)));
    }

    #[test]
    fn test_boolean_passes_through() {
        let result = run(&boolean(), json!(false));
        assert!(result.is_valid);
        assert_eq!(result.parsed, Parsed::Json(json!(false)));
    }

    #[test]
    fn test_other_values_rejected_with_original() {
        let result = run(&boolean(), json!("TRUE"));
        assert!(!result.is_valid);
        assert_eq!(result.parsed, Parsed::Json(json!("TRUE")));
        assert_eq!(result.message.as_deref(), Some("This value does not evaluate to type \"boolean\""));

        let result = run(&boolean().with_default(json!(true)), json!(1));
        assert!(!result.is_valid);
        assert_eq!(result.parsed, Parsed::Json(json!(true)));
    }

    #[test]
    fn test_absent_handling() {
        let result = run(&boolean(), Value::Null);
        assert!(result.is_valid);
        assert_eq!(result.parsed, Parsed::Json(Value::Null));

        let result = run(&boolean().with_default(json!(true)), Value::Null);
        assert!(result.is_valid);
        assert_eq!(result.parsed, Parsed::Json(json!(true)));

        let result = run(&boolean().required(), Value::Null);
        assert!(!result.is_valid);
        assert_eq!(result.parsed, Parsed::Json(json!(false)));
    }

    #[test]
    fn test_falsy_default_still_applies() {
        let result = run(&boolean().with_default(json!(false)), Value::Null);
        assert!(result.is_valid);
        assert_eq!(result.parsed, Parsed::Json(json!(false)));

        let result = run(&boolean().with_default(json!(false)), json!("maybe"));
        assert!(!result.is_valid);
        assert_eq!(result.parsed, Parsed::Json(json!(false)));
    }

    proptest! {
        #[test]
        fn prop_other_strings_rejected(s in "\\PC*") {
            prop_assume!(s != "true" && s != "false");
            let result = run(&boolean(), json!(s));
            prop_assert!(!result.is_valid);
        }

        #[test]
        fn prop_numbers_rejected(n in any::<i64>()) {
            prop_assert!(!run(&boolean(), json!(n)).is_valid);
        }
    }
}
