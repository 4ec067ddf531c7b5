//! Script validators
//!
//! Custom validation logic arrives as function source text in a schema's
//! `fnString`. It runs in an embedded Rhai engine, never as native code, and
//! every run is bounded by [`ScriptLimits`](crate::config::ScriptLimits).

mod executor;
mod extract;

pub use executor::{ScriptExecutor, ScriptVerdict};
pub use extract::{BodyExtractor, DefinitionExtractor};

use thiserror::Error;

/// Reasons a script produced no verdict
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("failed to extract function body: {0}")]
    Extract(String),

    #[error("failed to compile script: {0}")]
    Compile(String),

    #[error("script execution failed: {0}")]
    Runtime(String),

    #[error("script exceeded its time budget")]
    Timeout,

    #[error("script exceeded its operation budget")]
    OperationLimit,

    /// The script returned something other than a verdict map
    #[error("script returned an invalid result: {0}")]
    Shape(String),
}
