//! Validation result and error types

use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use super::ValidationType;

/// Prefix shared by type-mismatch messages
pub const TYPE_MISMATCH: &str = "This value does not evaluate to type";

/// Value carried in [`ValidationResponse::parsed`]
#[derive(Debug, Clone)]
pub enum Parsed {
    /// Coerced (or fallback) JSON value
    Json(Value),

    /// Compiled pattern produced by the regex validator
    Pattern(Regex),
}

impl Parsed {
    /// JSON value, if this is not a compiled pattern
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Parsed::Json(value) => Some(value),
            Parsed::Pattern(_) => None,
        }
    }

    /// Compiled pattern, if the regex validator produced one
    pub fn as_pattern(&self) -> Option<&Regex> {
        match self {
            Parsed::Pattern(re) => Some(re),
            Parsed::Json(_) => None,
        }
    }

    /// Convert into a JSON value; patterns become their source string
    pub fn into_json(self) -> Value {
        match self {
            Parsed::Json(value) => value,
            Parsed::Pattern(re) => Value::String(re.as_str().to_string()),
        }
    }
}

impl PartialEq for Parsed {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Parsed::Json(a), Parsed::Json(b)) => a == b,
            (Parsed::Pattern(a), Parsed::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl From<Value> for Parsed {
    fn from(value: Value) -> Self {
        Parsed::Json(value)
    }
}

impl Serialize for Parsed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Parsed::Json(value) => value.serialize(serializer),
            Parsed::Pattern(re) => serializer.serialize_str(re.as_str()),
        }
    }
}

/// Result of one validation attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    /// Whether the value was accepted
    pub is_valid: bool,

    /// Coerced value on success, fallback on failure
    pub parsed: Parsed,

    /// Explanation; always present when invalid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationResponse {
    /// Accept a value
    pub fn valid(parsed: impl Into<Parsed>) -> Self {
        Self {
            is_valid: true,
            parsed: parsed.into(),
            message: None,
        }
    }

    /// Reject a value with a fallback and an explanation
    pub fn invalid(parsed: impl Into<Parsed>, message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            parsed: parsed.into(),
            message: Some(message.into()),
        }
    }

    /// Message text, empty when none was given
    pub fn message_or_empty(&self) -> &str {
        self.message.as_deref().unwrap_or("")
    }
}

/// Schema authoring errors
///
/// These indicate a broken schema, not bad input, and are reported when a
/// schema is loaded or checked rather than during validation.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Type tag outside the supported set
    #[error("unknown validation type: {0}")]
    UnknownType(String),

    /// Parameter that the type does not recognize
    #[error("parameter '{param}' is not used by {ty} validation")]
    IrrelevantParam { ty: ValidationType, param: &'static str },

    /// Default whose JSON kind does not fit the type
    #[error("default for {ty} validation must be {expected}")]
    DefaultMismatch { ty: ValidationType, expected: &'static str },

    /// Same key listed twice in an object schema
    #[error("duplicate allowed key: {0}")]
    DuplicateKey(String),

    /// min greater than max
    #[error("min ({min}) is greater than max ({max})")]
    InvertedBounds { min: f64, max: f64 },

    /// Schema text could not be decoded
    #[error("failed to parse schema: {0}")]
    Parse(String),
}
