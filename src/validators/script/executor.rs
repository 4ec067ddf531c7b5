//! Rhai script executor

use super::{BodyExtractor, DefinitionExtractor, ScriptError};
use crate::config::ScriptLimits;
use crate::validators::ValidationContext;
use parking_lot::RwLock;
use rhai::packages::{Package, StandardPackage};
use rhai::{AST, Dynamic, Engine, EvalAltResult, Module, Scope, Shared};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Shape a script must return
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptVerdict {
    #[serde(rename = "isValid", alias = "is_valid")]
    pub is_valid: bool,

    #[serde(default)]
    pub parsed: Value,

    #[serde(default)]
    pub message: Option<String>,
}

/// Runs validation scripts inside a sandboxed Rhai engine
///
/// Compiled scripts are cached by source. Each run gets a fresh engine with
/// the configured limits and its own deadline, so one slow script cannot
/// affect another.
pub struct ScriptExecutor {
    limits: ScriptLimits,
    compiler: Engine,
    packages: Shared<Module>,
    cache: RwLock<HashMap<String, Arc<AST>>>,
    extractor: Box<dyn BodyExtractor>,
}

impl ScriptExecutor {
    /// Create an executor with the default body extractor
    pub fn new(limits: ScriptLimits) -> Self {
        Self::with_extractor(limits, DefinitionExtractor)
    }

    /// Create an executor with a custom body extractor
    pub fn with_extractor(limits: ScriptLimits, extractor: impl BodyExtractor + 'static) -> Self {
        let mut compiler = Engine::new_raw();
        compiler.set_max_expr_depths(limits.max_expr_depth, limits.max_expr_depth);

        Self {
            limits,
            compiler,
            packages: StandardPackage::new().as_shared_module(),
            cache: RwLock::new(HashMap::new()),
            extractor: Box::new(extractor),
        }
    }

    pub fn limits(&self) -> &ScriptLimits {
        &self.limits
    }

    /// Number of compiled scripts currently cached
    pub fn cached(&self) -> usize {
        self.cache.read().len()
    }

    /// Extract and compile a function definition, reusing cached output
    fn compile(&self, source: &str) -> Result<Arc<AST>, ScriptError> {
        if let Some(ast) = self.cache.read().get(source) {
            return Ok(Arc::clone(ast));
        }

        let body = self.extractor.extract(source)?;
        let ast = Arc::new(
            self.compiler
                .compile(&body)
                .map_err(|e| ScriptError::Compile(e.to_string()))?,
        );

        let mut cache = self.cache.write();
        if cache.len() >= self.limits.cache_capacity {
            debug!(entries = cache.len(), "Script cache full, clearing");
            cache.clear();
        }
        cache.insert(source.to_string(), Arc::clone(&ast));

        Ok(ast)
    }

    /// Engine with every sandbox limit applied and a deadline for this run
    fn sandboxed_engine(&self) -> Engine {
        let mut engine = Engine::new_raw();
        engine.register_global_module(self.packages.clone());

        engine.set_max_operations(self.limits.max_operations);
        engine.set_max_call_levels(self.limits.max_call_levels);
        engine.set_max_expr_depths(self.limits.max_expr_depth, self.limits.max_expr_depth);
        engine.set_max_string_size(self.limits.max_string_size);
        engine.set_max_array_size(self.limits.max_array_size);
        engine.set_max_map_size(self.limits.max_map_size);

        let deadline = Instant::now() + self.limits.timeout();
        engine.on_progress(move |_ops| {
            if Instant::now() >= deadline {
                Some("timeout".into())
            } else {
                None
            }
        });

        engine
    }

    /// Run a function definition against `(value, props)`
    pub fn run(
        &self,
        source: &str,
        value: &Value,
        context: &ValidationContext,
    ) -> Result<ScriptVerdict, ScriptError> {
        let ast = self.compile(source)?;

        let mut scope = Scope::new();
        scope.push_dynamic("value", to_dynamic(value)?);
        scope.push_dynamic("props", to_dynamic(context.props())?);

        let engine = self.sandboxed_engine();
        let output: Dynamic = engine
            .eval_ast_with_scope(&mut scope, &ast)
            .map_err(|e| classify(*e))?;

        rhai::serde::from_dynamic::<ScriptVerdict>(&output).map_err(|e| {
            warn!(returned = %output.type_name(), "Script returned an unexpected shape");
            ScriptError::Shape(e.to_string())
        })
    }
}

fn to_dynamic<T: serde::Serialize>(value: T) -> Result<Dynamic, ScriptError> {
    rhai::serde::to_dynamic(value).map_err(|e| ScriptError::Runtime(e.to_string()))
}

fn classify(err: EvalAltResult) -> ScriptError {
    match err {
        EvalAltResult::ErrorTerminated(..) => ScriptError::Timeout,
        EvalAltResult::ErrorTooManyOperations(..) => ScriptError::OperationLimit,
        other => ScriptError::Runtime(other.to_string()),
    }
}

impl std::fmt::Debug for ScriptExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptExecutor")
            .field("limits", &self.limits)
            .field("cached", &self.cached())
            .finish()
    }
}
