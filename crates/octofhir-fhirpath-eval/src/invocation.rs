//! Invocation evaluator nodes
//!
//! Member navigation goes through the context's model adapter, so what a
//! name means on a foreign node is entirely the adapter's decision. The
//! engine only flattens the results and keeps collection semantics: zero
//! results are the empty result, never an error.

use octofhir_fhirpath_system::{Collection, SystemValue};

use crate::context::EvalContext;
use crate::error::EvalResult;
use crate::eval::{to_collection, Evaluator, EvaluatorRef};

/// The `$this` invocation, yielding the current iteration item.
#[derive(Debug, Default)]
pub struct ThisInvocation;

impl ThisInvocation {
    pub fn new() -> Self {
        Self
    }
}

impl Evaluator for ThisInvocation {
    fn evaluate(
        &self,
        _ctx: &mut EvalContext,
        _focus: &Collection,
        this: Option<&SystemValue>,
    ) -> EvalResult<Option<SystemValue>> {
        Ok(this.cloned())
    }
}

/// Member access by name against every item of the focus.
///
/// Foreign nodes navigate through the model adapter; system values have
/// no members and contribute nothing.
#[derive(Debug)]
pub struct MemberInvocation {
    name: String,
}

impl MemberInvocation {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The member name this invocation navigates to
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Evaluator for MemberInvocation {
    fn evaluate(
        &self,
        ctx: &mut EvalContext,
        focus: &Collection,
        _this: Option<&SystemValue>,
    ) -> EvalResult<Option<SystemValue>> {
        let adapter = ctx.adapter().clone();
        let mut results = ctx.collection();
        for item in focus {
            if let SystemValue::Node(node) = item {
                for value in adapter.navigate(node, &self.name)? {
                    results.add(value)?;
                }
            }
        }
        Ok(match results.len() {
            0 => None,
            1 => results.get(0).cloned(),
            _ => Some(SystemValue::Collection(results)),
        })
    }
}

/// The path step `target.invocation`: the invocation runs with the
/// target's result as its focus.
#[derive(Debug)]
pub struct InvocationOperator {
    target: EvaluatorRef,
    invocation: EvaluatorRef,
}

impl InvocationOperator {
    pub fn new(target: EvaluatorRef, invocation: EvaluatorRef) -> Self {
        Self { target, invocation }
    }
}

impl Evaluator for InvocationOperator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext,
        focus: &Collection,
        this: Option<&SystemValue>,
    ) -> EvalResult<Option<SystemValue>> {
        let target = ctx.evaluate(&*self.target, focus, this)?;
        let next_focus = to_collection(ctx, target)?;
        ctx.evaluate(&*self.invocation, &next_focus, this)
    }
}
