//! Validation context - data passed to validators

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ValidationConfig, ValidationResponse, ValidatorRegistry};

/// Read-only named values available to script validators
///
/// Built-in validators never look inside the context; it is forwarded
/// unchanged through nested validation so scripts at any depth see it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationContext {
    props: Map<String, Value>,
}

impl ValidationContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named value
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.props.insert(name.into(), value);
        self
    }

    /// Get a named value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }

    /// All named values
    pub fn props(&self) -> &Map<String, Value> {
        &self.props
    }
}

impl From<Map<String, Value>> for ValidationContext {
    fn from(props: Map<String, Value>) -> Self {
        Self { props }
    }
}

/// State of one dispatch: the caller's context plus the nesting depth
///
/// Composite validators call [`Invocation::recurse`] for sub-schemas so
/// every nested value goes back through the registry.
#[derive(Clone, Copy)]
pub struct Invocation<'a> {
    registry: &'a ValidatorRegistry,
    context: &'a ValidationContext,
    depth: usize,
}

impl<'a> Invocation<'a> {
    pub(crate) fn root(registry: &'a ValidatorRegistry, context: &'a ValidationContext) -> Self {
        Self {
            registry,
            context,
            depth: 0,
        }
    }

    /// Caller-supplied context
    pub fn context(&self) -> &'a ValidationContext {
        self.context
    }

    /// Nesting depth; zero for the top-level call
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn registry(&self) -> &'a ValidatorRegistry {
        self.registry
    }

    /// Validate a nested value one level deeper
    pub fn recurse(&self, config: &ValidationConfig, value: &Value) -> ValidationResponse {
        let child = Self {
            depth: self.depth + 1,
            ..*self
        };
        self.registry.dispatch(config, value, &child)
    }
}

impl std::fmt::Debug for Invocation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invocation")
            .field("context", &self.context)
            .field("depth", &self.depth)
            .finish()
    }
}
