//! Validator registry - the single entry point for validation

use super::*;
use crate::config::EngineSettings;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Maps every type tag to its validator and dispatches calls
///
/// The tag set is closed, so lookup is an exhaustive `match` and cannot
/// miss. The registry is `Send + Sync`; share one across threads rather
/// than building one per call, since it owns the compiled-script cache.
pub struct ValidatorRegistry {
    settings: EngineSettings,
    scripts: script::ScriptExecutor,
}

impl ValidatorRegistry {
    /// Create a registry with the given settings
    pub fn new(settings: EngineSettings) -> Self {
        Self::with_executor(
            settings.clone(),
            script::ScriptExecutor::new(settings.script),
        )
    }

    /// Create a registry with a custom script executor
    pub fn with_executor(settings: EngineSettings, scripts: script::ScriptExecutor) -> Self {
        info!(
            validators = ValidationType::ALL.len(),
            max_depth = settings.engine.max_depth,
            "🔧 Validator registry ready"
        );
        Self { settings, scripts }
    }

    /// Get the validator for a type tag
    pub fn get(&self, validation_type: ValidationType) -> &dyn Validator {
        match validation_type {
            ValidationType::Text => &builtin::TextValidator,
            ValidationType::Regex => &builtin::RegexValidator,
            ValidationType::Number => &builtin::NumberValidator,
            ValidationType::Boolean => &builtin::BooleanValidator,
            ValidationType::Object => &builtin::ObjectValidator,
            ValidationType::Array => &builtin::ArrayValidator,
            ValidationType::ObjectArray => &builtin::ObjectArrayValidator,
            ValidationType::DateIsoString => &builtin::DateIsoStringValidator,
            ValidationType::Function => &builtin::FunctionValidator,
            ValidationType::ImageUrl => &builtin::ImageUrlValidator,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub(crate) fn scripts(&self) -> &script::ScriptExecutor {
        &self.scripts
    }

    /// Validate a value against a schema
    ///
    /// # Arguments
    /// * `config` - Schema describing the expected value
    /// * `value` - Raw value; `Value::Null` stands for an absent value
    /// * `context` - Named values visible to script validators
    pub fn validate(
        &self,
        config: &ValidationConfig,
        value: &Value,
        context: &ValidationContext,
    ) -> ValidationResponse {
        let inv = Invocation::root(self, context);
        self.dispatch(config, value, &inv)
    }

    pub(crate) fn dispatch(
        &self,
        config: &ValidationConfig,
        value: &Value,
        inv: &Invocation<'_>,
    ) -> ValidationResponse {
        let max_depth = self.settings.engine.max_depth;
        if inv.depth() > max_depth {
            warn!(max_depth, "🚫 Schema nesting exceeds maximum depth");
            return ValidationResponse::invalid(
                value.clone(),
                format!("Maximum validation depth of {} exceeded", max_depth),
            );
        }

        let validator = self.get(config.validation_type);
        debug!(
            validator = validator.name(),
            depth = inv.depth(),
            "Dispatching validation"
        );
        validator.validate(config, value, inv)
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("settings", &self.settings)
            .field("scripts", &self.scripts)
            .finish()
    }
}
