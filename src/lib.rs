//! # propcheck - property value coercion and validation
//!
//! Widget properties are authored as loosely-typed values: numbers arrive as
//! strings, objects as JSON text, custom checks as function source. propcheck
//! decides whether each value fits its declared type, coerces it when that is
//! safe, and explains rejections.
//!
//! ## Features
//! - Closed set of type tags, each with its own coercion rules
//! - Object and array sub-schemas, validated recursively
//! - Custom validation functions run in a sandboxed Rhai engine
//! - Every failure carries a message and a usable fallback value
//! - TOML-based engine settings
//!
//! ```rust
//! use propcheck::{validate, ValidationConfig, ValidationContext, ValidationType};
//! use serde_json::json;
//!
//! let config = ValidationConfig::new(ValidationType::Boolean);
//! let result = validate(&config, &json!("true"), &ValidationContext::new());
//! assert!(result.is_valid);
//! ```

use serde_json::Value;
use std::sync::LazyLock;

pub mod config;
pub mod validators;

pub use config::{EngineSettings, SettingsError};
pub use validators::{
    Parsed, SchemaError, ValidationConfig, ValidationContext, ValidationResponse, ValidationType,
    ValidatorRegistry,
};

static DEFAULT_REGISTRY: LazyLock<ValidatorRegistry> = LazyLock::new(ValidatorRegistry::default);

/// Validate a value with the default settings
///
/// Uses a process-wide registry; build a [`ValidatorRegistry`] directly to
/// apply custom [`EngineSettings`].
pub fn validate(
    config: &ValidationConfig,
    value: &Value,
    context: &ValidationContext,
) -> ValidationResponse {
    DEFAULT_REGISTRY.validate(config, value, context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_registry_validates() {
        let config = ValidationConfig::new(ValidationType::Text);
        let result = validate(&config, &json!(42), &ValidationContext::new());
        assert!(result.is_valid);
        assert_eq!(result.parsed, Parsed::Json(json!("42")));
    }

    #[test]
    fn test_schema_loaded_from_json_drives_validation() {
        let config = ValidationConfig::from_json_str(
            r#"{
                "type": "OBJECT",
                "params": {
                    "required": true,
                    "allowedKeys": [
                        { "name": "title", "type": "TEXT", "params": { "required": true } },
                        {
                            "name": "rows",
                            "type": "ARRAY",
                            "params": { "children": { "type": "OBJECT_ARRAY" } }
                        },
                        { "name": "since", "type": "DATE_ISO_STRING" }
                    ]
                }
            }"#,
        )
        .unwrap();
        let ctx = ValidationContext::new();

        let ok = validate(
            &config,
            &json!(r#"{"title": 7, "rows": [[{"a": 1}]], "since": "2024-01-02T03:04:05.000Z"}"#),
            &ctx,
        );
        assert!(ok.is_valid, "{:?}", ok.message);

        let missing = validate(&config, &json!({ "rows": [] }), &ctx);
        assert_eq!(missing.message.as_deref(), Some("Missing required key: title"));

        let bad_rows = validate(&config, &json!({ "title": "t", "rows": [[1]] }), &ctx);
        assert!(!bad_rows.is_valid);
        assert_eq!(
            bad_rows.message.as_deref(),
            Some("Value of key: rows is invalid: Invalid entry at index: 0. Invalid object at index 0")
        );
    }

    #[test]
    fn test_response_serializes_for_callers() {
        let config = ValidationConfig::new(ValidationType::Number).with_min(1.0);
        let result = validate(&config, &json!("0"), &ValidationContext::new());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "isValid": false, "parsed": 0, "message": "Minimum allowed value: 1 " })
        );
    }
}
