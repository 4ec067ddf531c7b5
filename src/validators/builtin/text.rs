//! Text and regex validators

use crate::validators::value::{display_text, is_absent, scalar_text};
use crate::validators::*;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

fn string_mismatch() -> String {
    format!("{} \"string\"", TYPE_MISMATCH)
}

fn regex_mismatch() -> String {
    format!("{} \"regex\"", TYPE_MISMATCH)
}

/// Coerces scalars to text; rejects structures
pub struct TextValidator;

impl Validator for TextValidator {
    fn validate(
        &self,
        config: &ValidationConfig,
        value: &Value,
        _inv: &Invocation<'_>,
    ) -> ValidationResponse {
        if is_absent(value) {
            let fallback = config.default_or(Value::String(String::new()));
            if config.is_required() {
                return ValidationResponse::invalid(fallback, string_mismatch());
            }
            return ValidationResponse::valid(fallback);
        }

        match scalar_text(value) {
            Some(text) => ValidationResponse::valid(Value::String(text)),
            None => {
                debug!("Structured value where text was expected");
                // pretty-printed so the caller can show what was received
                let rendered =
                    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
                ValidationResponse::invalid(Value::String(rendered), string_mismatch())
            }
        }
    }

    fn name(&self) -> &str {
        "text"
    }

    fn validation_type(&self) -> ValidationType {
        ValidationType::Text
    }
}

/// Compiles text into a pattern
///
/// Accepted text is reported as *invalid* with the compiled pattern as the
/// parsed value. Callers rely on the pattern and ignore the flag; keep this
/// inversion unless every consumer is updated together.
pub struct RegexValidator;

impl Validator for RegexValidator {
    fn validate(
        &self,
        config: &ValidationConfig,
        value: &Value,
        inv: &Invocation<'_>,
    ) -> ValidationResponse {
        let text = TextValidator.validate(config, value, inv);
        if !text.is_valid {
            return text;
        }

        let source = display_text(&text.parsed.into_json());
        match Regex::new(&source) {
            Ok(re) => ValidationResponse::invalid(Parsed::Pattern(re), regex_mismatch()),
            Err(e) => {
                warn!(pattern = %source, error = %e, "Failed to compile pattern");
                ValidationResponse::invalid(Value::String(source), regex_mismatch())
            }
        }
    }

    fn name(&self) -> &str {
        "regex"
    }

    fn validation_type(&self) -> ValidationType {
        ValidationType::Regex
    }
}
