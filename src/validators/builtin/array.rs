//! Array and object-array validators

use crate::validators::value::{display_text, is_absent, is_plain_object, same_value};
use crate::validators::*;
use serde_json::{Map, Value};
use tracing::{debug, warn};

const REQUIRED_MESSAGE: &str = "This property is required for the widget to function correctly";

fn array_mismatch() -> String {
    format!("{} Array", TYPE_MISMATCH)
}

fn object_array_mismatch() -> String {
    format!("{} Array of objects", TYPE_MISMATCH)
}

/// Accepts arrays, or JSON text encoding one, and checks every entry
pub struct ArrayValidator;

impl ArrayValidator {
    fn validate_entries(
        config: &ValidationConfig,
        entries: &[Value],
        inv: &Invocation<'_>,
    ) -> ValidationResponse {
        let original = Value::Array(entries.to_vec());

        if let Some(allowed) = &config.params.allowed_values {
            if let Some(entry) = entries
                .iter()
                .find(|entry| !allowed.iter().any(|a| same_value(a, entry)))
            {
                debug!(entry = %entry, "Disallowed array entry");
                return ValidationResponse::invalid(
                    original,
                    format!("Disallowed value: {}", display_text(entry)),
                );
            }
        }

        let Some(children) = &config.params.children else {
            return ValidationResponse::valid(original);
        };

        let failures: Vec<String> = entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let child = inv.recurse(children, entry);
                (!child.is_valid).then(|| {
                    format!(
                        "Invalid entry at index: {}. {}",
                        index,
                        child.message_or_empty()
                    )
                })
            })
            .collect();

        if failures.is_empty() {
            ValidationResponse::valid(original)
        } else {
            ValidationResponse::invalid(original, failures.join(" "))
        }
    }
}

impl Validator for ArrayValidator {
    fn validate(
        &self,
        config: &ValidationConfig,
        value: &Value,
        inv: &Invocation<'_>,
    ) -> ValidationResponse {
        let invalid = |message: String| {
            ValidationResponse::invalid(config.default_or(Value::Array(Vec::new())), message)
        };

        if is_absent(value) {
            if config.is_required() {
                return invalid(REQUIRED_MESSAGE.to_string());
            }
            return ValidationResponse::valid(value.clone());
        }

        match value {
            Value::Array(entries) => Self::validate_entries(config, entries, inv),
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(Value::Array(entries)) => Self::validate_entries(config, &entries, inv),
                Ok(_) => invalid(array_mismatch()),
                Err(e) => {
                    warn!(error = %e, "Error when parsing text to array");
                    invalid(array_mismatch())
                }
            },
            _ => invalid(array_mismatch()),
        }
    }

    fn name(&self) -> &str {
        "array"
    }

    fn validation_type(&self) -> ValidationType {
        ValidationType::Array
    }
}

/// Accepts arrays whose entries are all objects; no sub-schema
pub struct ObjectArrayValidator;

impl Validator for ObjectArrayValidator {
    fn validate(
        &self,
        config: &ValidationConfig,
        value: &Value,
        _inv: &Invocation<'_>,
    ) -> ValidationResponse {
        let fallback = || config.default_or(Value::Array(vec![Value::Object(Map::new())]));

        let parsed = match value {
            Value::Array(_) => value.clone(),
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!(error = %e, "Error when parsing text to object array");
                    return ValidationResponse::invalid(fallback(), object_array_mismatch());
                }
            },
            _ => return ValidationResponse::invalid(fallback(), object_array_mismatch()),
        };

        let Value::Array(entries) = &parsed else {
            return ValidationResponse::invalid(fallback(), object_array_mismatch());
        };

        if let Some(index) = entries.iter().position(|entry| !is_plain_object(entry)) {
            return ValidationResponse::invalid(
                fallback(),
                format!("Invalid object at index {}", index),
            );
        }

        ValidationResponse::valid(parsed)
    }

    fn name(&self) -> &str {
        "object_array"
    }

    fn validation_type(&self) -> ValidationType {
        ValidationType::ObjectArray
    }
}
