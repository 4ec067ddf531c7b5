//! Engine settings loaded from TOML.
//!
//! Settings bound the two places where validation can do unbounded work:
//! schema recursion and script execution. Every field has a default, so an
//! empty file (or no file at all) gives a usable engine.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors returned while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Reading the settings file failed
    #[error("failed to read settings: {0}")]
    Read(#[from] std::io::Error),

    /// The file is not valid settings TOML
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// A limit is out of range
    #[error("invalid setting {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Main settings structure
///
/// # Example TOML
/// ```toml
/// [engine]
/// max_depth = 16
///
/// [script]
/// max_operations = 50000
/// timeout_ms = 250
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSettings {
    #[serde(default)]
    pub engine: DispatchSettings,
    #[serde(default)]
    pub script: ScriptLimits,
}

/// Dispatcher settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchSettings {
    /// Deepest sub-schema nesting validated before giving up
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

/// Resource limits applied to script validators
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptLimits {
    #[serde(default = "default_max_operations")]
    pub max_operations: u64,

    #[serde(default = "default_max_call_levels")]
    pub max_call_levels: usize,

    #[serde(default = "default_max_expr_depth")]
    pub max_expr_depth: usize,

    #[serde(default = "default_max_string_size")]
    pub max_string_size: usize,

    #[serde(default = "default_max_collection_size")]
    pub max_array_size: usize,

    #[serde(default = "default_max_collection_size")]
    pub max_map_size: usize,

    /// Wall-clock budget for one script run
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Compiled scripts kept in memory
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_max_depth() -> usize {
    32
}

fn default_max_operations() -> u64 {
    100_000
}

fn default_max_call_levels() -> usize {
    32
}

fn default_max_expr_depth() -> usize {
    64
}

fn default_max_string_size() -> usize {
    1 << 20
}

fn default_max_collection_size() -> usize {
    10_000
}

fn default_timeout_ms() -> u64 {
    1_000
}

fn default_cache_capacity() -> usize {
    256
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

impl Default for ScriptLimits {
    fn default() -> Self {
        Self {
            max_operations: default_max_operations(),
            max_call_levels: default_max_call_levels(),
            max_expr_depth: default_max_expr_depth(),
            max_string_size: default_max_string_size(),
            max_array_size: default_max_collection_size(),
            max_map_size: default_max_collection_size(),
            timeout_ms: default_timeout_ms(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl ScriptLimits {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl EngineSettings {
    /// Load settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate settings from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, SettingsError> {
        let settings: EngineSettings = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject limits that would make every call fail
    pub fn validate(&self) -> Result<(), SettingsError> {
        let zero_checks: [(&'static str, bool); 6] = [
            ("engine.max_depth", self.engine.max_depth == 0),
            ("script.max_operations", self.script.max_operations == 0),
            ("script.max_call_levels", self.script.max_call_levels == 0),
            ("script.max_expr_depth", self.script.max_expr_depth == 0),
            ("script.timeout_ms", self.script.timeout_ms == 0),
            ("script.cache_capacity", self.script.cache_capacity == 0),
        ];

        for (field, is_zero) in zero_checks {
            if is_zero {
                return Err(SettingsError::Invalid {
                    field,
                    message: "must be greater than 0".to_string(),
                });
            }
        }

        Ok(())
    }
}
