//! Validation schemas - what a property value should look like

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use super::{SchemaError, ValidationType};

/// Description of an expected value: a type tag plus optional parameters
///
/// # Example JSON
/// ```json
/// {
///   "type": "ARRAY",
///   "params": {
///     "required": true,
///     "children": { "type": "NUMBER", "params": { "min": 0 } }
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Target type
    #[serde(rename = "type")]
    pub validation_type: ValidationType,

    /// Type-specific parameters
    #[serde(default, skip_serializing_if = "ValidationParams::is_empty")]
    pub params: ValidationParams,
}

/// Optional parameters; each type only reads a subset of them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ValidationParams {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// Allow-list for array entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<Value>>,

    /// Per-key sub-schemas for objects, checked in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_keys: Option<Vec<AllowedKey>>,

    /// Sub-schema applied to every array entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Box<ValidationConfig>>,

    /// Source of a custom validation function
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fn_string: Option<String>,
}

/// One key of an object schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowedKey {
    pub name: String,

    #[serde(flatten)]
    pub config: ValidationConfig,
}

impl ValidationParams {
    pub fn is_empty(&self) -> bool {
        *self == ValidationParams::default()
    }

    /// Names of the optional parameters that are set
    fn present(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.min.is_some() {
            names.push("min");
        }
        if self.max.is_some() {
            names.push("max");
        }
        if self.allowed_values.is_some() {
            names.push("allowedValues");
        }
        if self.allowed_keys.is_some() {
            names.push("allowedKeys");
        }
        if self.children.is_some() {
            names.push("children");
        }
        if self.fn_string.is_some() {
            names.push("fnString");
        }
        names
    }
}

impl ValidationConfig {
    /// Create a schema with no parameters
    pub fn new(validation_type: ValidationType) -> Self {
        Self {
            validation_type,
            params: ValidationParams::default(),
        }
    }

    pub fn required(mut self) -> Self {
        self.params.required = true;
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.params.default = Some(default);
        self
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.params.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.params.max = Some(max);
        self
    }

    pub fn with_allowed_values(mut self, values: Vec<Value>) -> Self {
        self.params.allowed_values = Some(values);
        self
    }

    /// Append a key to the object schema
    pub fn with_key(mut self, name: impl Into<String>, config: ValidationConfig) -> Self {
        self.params
            .allowed_keys
            .get_or_insert_with(Vec::new)
            .push(AllowedKey {
                name: name.into(),
                config,
            });
        self
    }

    pub fn with_children(mut self, children: ValidationConfig) -> Self {
        self.params.children = Some(Box::new(children));
        self
    }

    pub fn with_fn(mut self, source: impl Into<String>) -> Self {
        self.params.fn_string = Some(source.into());
        self
    }

    /// Whether the value must be present
    pub fn is_required(&self) -> bool {
        self.params.required
    }

    /// Configured default, or `fallback` when none is set
    pub fn default_or(&self, fallback: Value) -> Value {
        self.params.default.clone().unwrap_or(fallback)
    }

    /// Load and check a schema from JSON text
    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        let config: ValidationConfig =
            serde_json::from_str(text).map_err(|e| SchemaError::Parse(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    /// Load and check a schema from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, SchemaError> {
        let config: ValidationConfig =
            toml::from_str(text).map_err(|e| SchemaError::Parse(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    /// Check that the schema only uses parameters its type understands
    ///
    /// Recurses into key and entry sub-schemas.
    pub fn check(&self) -> Result<(), SchemaError> {
        let ty = self.validation_type;
        let relevant = relevant_params(ty);
        if let Some(param) = self
            .params
            .present()
            .into_iter()
            .find(|p| !relevant.contains(p))
        {
            return Err(SchemaError::IrrelevantParam { ty, param });
        }

        if let Some(default) = &self.params.default {
            let expected = expected_default(ty);
            if !default_fits(ty, default) {
                return Err(SchemaError::DefaultMismatch { ty, expected });
            }
        }

        if let (Some(min), Some(max)) = (self.params.min, self.params.max) {
            if min > max {
                return Err(SchemaError::InvertedBounds { min, max });
            }
        }

        if let Some(keys) = &self.params.allowed_keys {
            let mut seen = HashSet::new();
            for key in keys {
                if !seen.insert(key.name.as_str()) {
                    return Err(SchemaError::DuplicateKey(key.name.clone()));
                }
                key.config.check()?;
            }
        }

        if let Some(children) = &self.params.children {
            children.check()?;
        }

        Ok(())
    }
}

fn relevant_params(ty: ValidationType) -> &'static [&'static str] {
    match ty {
        ValidationType::Number => &["min", "max"],
        ValidationType::Array => &["allowedValues", "children"],
        ValidationType::Object => &["allowedKeys"],
        ValidationType::Function => &["fnString"],
        ValidationType::Text
        | ValidationType::Regex
        | ValidationType::Boolean
        | ValidationType::ObjectArray
        | ValidationType::DateIsoString
        | ValidationType::ImageUrl => &[],
    }
}

fn expected_default(ty: ValidationType) -> &'static str {
    match ty {
        ValidationType::Text
        | ValidationType::Regex
        | ValidationType::DateIsoString
        | ValidationType::ImageUrl => "a string",
        ValidationType::Number => "a number",
        ValidationType::Boolean => "a boolean",
        ValidationType::Object => "an object",
        ValidationType::Array | ValidationType::ObjectArray => "an array",
        ValidationType::Function => "any value",
    }
}

fn default_fits(ty: ValidationType, default: &Value) -> bool {
    match ty {
        ValidationType::Text
        | ValidationType::Regex
        | ValidationType::DateIsoString
        | ValidationType::ImageUrl => default.is_string(),
        ValidationType::Number => default.is_number(),
        ValidationType::Boolean => default.is_boolean(),
        ValidationType::Object => default.is_object(),
        ValidationType::Array | ValidationType::ObjectArray => default.is_array(),
        ValidationType::Function => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_nested_schema() {
        let config = ValidationConfig::from_json_str(
            r#"{
                "type": "OBJECT",
                "params": {
                    "allowedKeys": [
                        { "name": "label", "type": "TEXT", "params": { "required": true } },
                        { "name": "size", "type": "NUMBER", "params": { "min": 1, "max": 10 } }
                    ]
                }
            }"#,
        )
        .unwrap();

        let keys = config.params.allowed_keys.as_ref().unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].name, "label");
        assert!(keys[0].config.is_required());
        assert_eq!(keys[1].config.params.max, Some(10.0));
    }

    #[test]
    fn test_parse_toml_schema() {
        let config = ValidationConfig::from_toml_str(
            r#"
type = "ARRAY"

[params]
required = true

[params.children]
type = "TEXT"
"#,
        )
        .unwrap();

        assert_eq!(config.validation_type, ValidationType::Array);
        assert_eq!(
            config.params.children.as_deref().map(|c| c.validation_type),
            Some(ValidationType::Text)
        );
    }

    #[test]
    fn test_unknown_tag_fails_to_load() {
        let err = ValidationConfig::from_json_str(r#"{ "type": "COLOR" }"#).unwrap_err();
        assert!(matches!(err, SchemaError::Parse(_)));
    }

    #[test]
    fn test_unknown_param_fails_to_load() {
        let err =
            ValidationConfig::from_json_str(r#"{ "type": "TEXT", "params": { "maxLength": 3 } }"#)
                .unwrap_err();
        assert!(matches!(err, SchemaError::Parse(_)));
    }

    #[test]
    fn test_irrelevant_param_rejected() {
        let err = ValidationConfig::new(ValidationType::Text)
            .with_min(1.0)
            .check()
            .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::IrrelevantParam { ty: ValidationType::Text, param: "min" }
        ));
    }

    #[test]
    fn test_irrelevant_param_in_child_rejected() {
        let config = ValidationConfig::new(ValidationType::Array)
            .with_children(ValidationConfig::new(ValidationType::Boolean).with_fn("true"));
        assert!(matches!(
            config.check(),
            Err(SchemaError::IrrelevantParam { param: "fnString", .. })
        ));
    }

    #[test]
    fn test_default_kind_checked() {
        let err = ValidationConfig::new(ValidationType::Number)
            .with_default(json!("five"))
            .check()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DefaultMismatch { expected: "a number", .. }));

        assert!(
            ValidationConfig::new(ValidationType::Function)
                .with_default(json!({ "any": "thing" }))
                .check()
                .is_ok()
        );
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let config = ValidationConfig::new(ValidationType::Object)
            .with_key("a", ValidationConfig::new(ValidationType::Text))
            .with_key("a", ValidationConfig::new(ValidationType::Number));
        assert!(matches!(config.check(), Err(SchemaError::DuplicateKey(name)) if name == "a"));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let config = ValidationConfig::new(ValidationType::Number)
            .with_min(10.0)
            .with_max(1.0);
        assert!(matches!(config.check(), Err(SchemaError::InvertedBounds { .. })));
    }

    #[test]
    fn test_falsy_defaults_kept() {
        for default in [json!(false), json!(0), json!("")] {
            let config = ValidationConfig::new(ValidationType::Text).with_default(default.clone());
            assert_eq!(config.default_or(json!("fallback")), default);
        }
        let config = ValidationConfig::new(ValidationType::Text);
        assert_eq!(config.default_or(json!("fallback")), json!("fallback"));
    }

    #[test]
    fn test_serialize_skips_empty_params() {
        let out = serde_json::to_value(ValidationConfig::new(ValidationType::Boolean)).unwrap();
        assert_eq!(out, json!({ "type": "BOOLEAN" }));
    }
}
