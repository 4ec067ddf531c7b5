//! Function validator - schema-supplied logic run as a script

use crate::validators::*;
use serde_json::Value;
use tracing::{debug, warn};

const FAILED_MESSAGE: &str = "Failed to validate";

/// Delegates to the script in `fnString`
///
/// The script sees `value` and `props` and returns a map with `isValid`,
/// `parsed` and `message`. Every failure to get such a map, including
/// hitting a sandbox limit, is reported as one generic invalid response.
pub struct FunctionValidator;

impl Validator for FunctionValidator {
    fn validate(
        &self,
        config: &ValidationConfig,
        value: &Value,
        inv: &Invocation<'_>,
    ) -> ValidationResponse {
        let failed = || ValidationResponse::invalid(Value::Null, FAILED_MESSAGE);

        let Some(source) = config.params.fn_string.as_deref() else {
            debug!("Function validation without fnString");
            return failed();
        };

        match inv.registry().scripts().run(source, value, inv.context()) {
            Ok(verdict) => ValidationResponse {
                is_valid: verdict.is_valid,
                parsed: Parsed::Json(verdict.parsed),
                message: match verdict.message {
                    Some(message) => Some(message),
                    None if !verdict.is_valid => Some(FAILED_MESSAGE.to_string()),
                    None => None,
                },
            },
            Err(e) => {
                warn!(error = %e, "Validation function error");
                failed()
            }
        }
    }

    fn name(&self) -> &str {
        "function"
    }

    fn validation_type(&self) -> ValidationType {
        ValidationType::Function
    }
}
