//! Validator framework for propcheck
//!
//! This module turns loosely-typed property values into the types their
//! consumers expect, or explains why it cannot.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │       Validator Registry                │
//! ├─────────────────────────────────────────┤
//! │  • One validator per type tag           │
//! │  • Depth-limited recursive dispatch     │
//! │  • Owns the script executor             │
//! └────────┬────────────────────────────────┘
//!          │
//!          ├──> Leaf validators (text, number, boolean, date, image, regex)
//!          ├──> Composite validators (object, array, object array)
//!          └──> Function validator ──> Rhai script executor
//! ```
//!
//! Composite validators hand each key or entry back to the registry, so
//! sub-schemas nest to any depth the settings allow.
//!
//! # Example Usage
//!
//! ```rust
//! use propcheck::validators::*;
//! use serde_json::json;
//!
//! let registry = ValidatorRegistry::default();
//! let config = ValidationConfig::new(ValidationType::Number).with_max(10.0);
//!
//! let result = registry.validate(&config, &json!("7"), &ValidationContext::new());
//! assert!(result.is_valid);
//! assert_eq!(result.parsed.as_json(), Some(&json!(7)));
//! ```

pub mod builtin;
pub mod context;
pub mod registry;
pub mod result;
pub mod schema;
pub mod script;
pub mod traits;
pub mod value;

// Re-export commonly used types
pub use context::{Invocation, ValidationContext};
pub use registry::ValidatorRegistry;
pub use result::{Parsed, SchemaError, TYPE_MISMATCH, ValidationResponse};
pub use schema::{AllowedKey, ValidationConfig, ValidationParams};
pub use script::{BodyExtractor, ScriptError};
pub use traits::{ValidationType, Validator};
