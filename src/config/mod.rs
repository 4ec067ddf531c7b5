//! Configuration module for propcheck.
//!
//! This module handles loading TOML-based engine settings: the dispatcher's
//! recursion limit and the sandbox limits for script validators.

mod config;

pub use config::{DispatchSettings, EngineSettings, ScriptLimits, SettingsError};
