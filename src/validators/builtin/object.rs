//! Object validator with per-key sub-schemas

use crate::validators::value::is_absent_or_blank;
use crate::validators::*;
use serde_json::{Map, Value};
use tracing::{debug, warn};

fn object_mismatch() -> String {
    format!("{}: Object", TYPE_MISMATCH)
}

/// Accepts objects, or JSON text encoding one, and checks listed keys
pub struct ObjectValidator;

impl ObjectValidator {
    /// Check each configured key against its sub-schema
    ///
    /// A missing required key ends the check immediately; keys after it are
    /// not examined.
    fn validate_keys(
        config: &ValidationConfig,
        object: &Map<String, Value>,
        inv: &Invocation<'_>,
    ) -> ValidationResponse {
        let original = Value::Object(object.clone());
        let Some(allowed_keys) = &config.params.allowed_keys else {
            return ValidationResponse::valid(original);
        };

        let mut messages = Vec::new();
        let mut all_valid = true;

        for key in allowed_keys {
            match object.get(&key.name) {
                Some(entry) => {
                    let child = inv.recurse(&key.config, entry);
                    if !child.is_valid {
                        all_valid = false;
                        if let Some(message) = child.message.filter(|m| !m.is_empty()) {
                            messages.push(format!(
                                "Value of key: {} is invalid: {}",
                                key.name, message
                            ));
                        }
                    }
                }
                None if key.config.is_required() => {
                    debug!(key = %key.name, "Missing required key");
                    return ValidationResponse::invalid(
                        original,
                        format!("Missing required key: {}", key.name),
                    );
                }
                None => {}
            }
        }

        if all_valid {
            return ValidationResponse::valid(original);
        }

        let message = if messages.is_empty() {
            object_mismatch()
        } else {
            messages.join(" ")
        };
        ValidationResponse::invalid(config.default_or(original), message)
    }
}

impl Validator for ObjectValidator {
    fn validate(
        &self,
        config: &ValidationConfig,
        value: &Value,
        inv: &Invocation<'_>,
    ) -> ValidationResponse {
        if is_absent_or_blank(value) {
            if config.is_required() {
                return ValidationResponse::invalid(
                    config.default_or(Value::Object(Map::new())),
                    object_mismatch(),
                );
            }
            return ValidationResponse::valid(config.default_or(value.clone()));
        }

        if let Value::Object(object) = value {
            return Self::validate_keys(config, object, inv);
        }

        let invalid = || {
            ValidationResponse::invalid(
                config.default_or(Value::Object(Map::new())),
                object_mismatch(),
            )
        };

        let Value::String(text) = value else {
            debug!("Value is neither an object nor JSON text");
            return invalid();
        };

        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(object)) => Self::validate_keys(config, &object, inv),
            Ok(_) => invalid(),
            Err(e) => {
                warn!(error = %e, "Error when parsing text to object");
                invalid()
            }
        }
    }

    fn name(&self) -> &str {
        "object"
    }

    fn validation_type(&self) -> ValidationType {
        ValidationType::Object
    }
}
