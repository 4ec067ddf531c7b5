//! Core validator traits and interfaces
//!
//! This module defines the fundamental abstractions for the validator framework.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Invocation, SchemaError, ValidationConfig, ValidationResponse};

/// The core validator trait that all validators must implement.
///
/// Validators never fail: every rejection is reported as an invalid
/// [`ValidationResponse`] carrying a message and a fallback value.
pub trait Validator: Send + Sync {
    /// Validate a raw value
    ///
    /// # Arguments
    /// * `config` - The schema the value is checked against
    /// * `value` - The raw value as produced by the evaluation layer
    /// * `inv` - Context and dispatch state for this call
    fn validate(
        &self,
        config: &ValidationConfig,
        value: &Value,
        inv: &Invocation<'_>,
    ) -> ValidationResponse;

    /// Get validator name (for logging and debugging)
    fn name(&self) -> &str;

    /// Get the type tag this validator handles
    fn validation_type(&self) -> ValidationType;
}

/// Target type of a property value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationType {
    Text,
    Regex,
    Number,
    Boolean,
    Object,
    Array,
    ObjectArray,
    DateIsoString,
    Function,
    ImageUrl,
}

impl ValidationType {
    /// Every supported tag, in declaration order
    pub const ALL: [ValidationType; 10] = [
        ValidationType::Text,
        ValidationType::Regex,
        ValidationType::Number,
        ValidationType::Boolean,
        ValidationType::Object,
        ValidationType::Array,
        ValidationType::ObjectArray,
        ValidationType::DateIsoString,
        ValidationType::Function,
        ValidationType::ImageUrl,
    ];

    /// Tag as it appears in serialized schemas
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationType::Text => "TEXT",
            ValidationType::Regex => "REGEX",
            ValidationType::Number => "NUMBER",
            ValidationType::Boolean => "BOOLEAN",
            ValidationType::Object => "OBJECT",
            ValidationType::Array => "ARRAY",
            ValidationType::ObjectArray => "OBJECT_ARRAY",
            ValidationType::DateIsoString => "DATE_ISO_STRING",
            ValidationType::Function => "FUNCTION",
            ValidationType::ImageUrl => "IMAGE_URL",
        }
    }
}

impl std::fmt::Display for ValidationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ValidationType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValidationType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownType(s.to_string()))
    }
}
