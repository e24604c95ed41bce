//! Evaluation context for FHIRPath execution
//!
//! A context is created per evaluation call and owns the mutable state of
//! that call: the model adapter collections are bound to and the current
//! recursion depth. Evaluator trees themselves stay immutable and are
//! shared across calls; all child evaluation goes through
//! [`EvalContext::evaluate`] so nesting depth is bounded uniformly.

use std::sync::Arc;

use octofhir_fhirpath_system::{AdapterRef, Collection, JsonModelAdapter, SystemValue};

use crate::error::{EvalError, EvalResult};
use crate::eval::Evaluator;

/// Default bound on expression nesting depth
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Per-call evaluation state
pub struct EvalContext {
    adapter: AdapterRef,
    max_depth: usize,
    depth: usize,
}

impl Default for EvalContext {
    /// Context over the built-in JSON adapter
    fn default() -> Self {
        Self::new(Arc::new(JsonModelAdapter::new()))
    }
}

impl EvalContext {
    /// Create a context bound to a model adapter
    pub fn new(adapter: AdapterRef) -> Self {
        Self {
            adapter,
            max_depth: DEFAULT_MAX_DEPTH,
            depth: 0,
        }
    }

    /// Replace the nesting depth limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The model adapter this context navigates and converts through
    pub fn adapter(&self) -> &AdapterRef {
        &self.adapter
    }

    /// New empty collection bound to this context's adapter
    pub fn collection(&self) -> Collection {
        Collection::new(self.adapter.clone())
    }

    /// Evaluate a node, counting it against the nesting depth limit.
    ///
    /// Every parent node evaluates its children through this method, so
    /// pathological nesting surfaces as [`EvalError::RecursionLimit`]
    /// instead of exhausting the call stack.
    pub fn evaluate(
        &mut self,
        node: &dyn Evaluator,
        focus: &Collection,
        this: Option<&SystemValue>,
    ) -> EvalResult<Option<SystemValue>> {
        if self.depth >= self.max_depth {
            return Err(EvalError::RecursionLimit {
                depth: self.max_depth,
            });
        }
        self.depth += 1;
        let result = node.evaluate(self, focus, this);
        self.depth -= 1;
        result
    }
}
