//! The evaluator node contract
//!
//! An expression compiles to an immutable tree of [`Evaluator`] nodes,
//! built once and re-evaluated against any number of contexts. Leaves are
//! literals and invocations; interior nodes are operators holding their
//! already-built children. `evaluate` returns `Ok(None)` for the empty
//! result; `Err` aborts the whole call.

use std::fmt;

use octofhir_fhirpath_system::{Collection, SystemValue};

use crate::context::EvalContext;
use crate::error::{EvalError, EvalResult};

/// One node of a compiled expression tree.
pub trait Evaluator: fmt::Debug + Send + Sync {
    /// Evaluate against a focus collection and an optional iteration item.
    fn evaluate(
        &self,
        ctx: &mut EvalContext,
        focus: &Collection,
        this: Option<&SystemValue>,
    ) -> EvalResult<Option<SystemValue>>;
}

/// Owned evaluator child
pub type EvaluatorRef = Box<dyn Evaluator>;

/// Collapse a result to at most one value.
///
/// Collections of zero items become the empty result and singleton
/// collections unwrap to their item; more than one item is an error for
/// operators that need a single operand.
pub fn singleton(value: Option<SystemValue>) -> EvalResult<Option<SystemValue>> {
    match value {
        Some(SystemValue::Collection(collection)) => match collection.len() {
            0 => Ok(None),
            1 => Ok(collection.get(0).cloned()),
            count => Err(EvalError::SingletonRequired { count }),
        },
        other => Ok(other),
    }
}

/// Like [`singleton`] but keeps collections of two or more items intact
/// instead of erroring. Equality operators use this: comparing a
/// multi-item collection is defined, feeding one to arithmetic is not.
pub fn flatten_singleton(value: Option<SystemValue>) -> Option<SystemValue> {
    match value {
        Some(SystemValue::Collection(collection)) => match collection.len() {
            0 => None,
            1 => collection.get(0).cloned(),
            _ => Some(SystemValue::Collection(collection)),
        },
        other => other,
    }
}

/// View a result as a collection: the empty result is the empty
/// collection and a bare value is a collection of one.
pub fn to_collection(ctx: &EvalContext, value: Option<SystemValue>) -> EvalResult<Collection> {
    match value {
        None => Ok(ctx.collection()),
        Some(SystemValue::Collection(collection)) => Ok(collection),
        Some(item) => {
            let mut collection = ctx.collection();
            collection.add(item)?;
            Ok(collection)
        }
    }
}

/// Extract a boolean operand for the logical operators; empty stays
/// empty and any non-boolean kind is a type mismatch.
pub fn boolean_operand(value: Option<SystemValue>) -> EvalResult<Option<bool>> {
    match singleton(value)? {
        None => Ok(None),
        Some(SystemValue::Boolean(b)) => Ok(Some(b)),
        Some(other) => Err(EvalError::type_mismatch(
            "System.Boolean",
            other.type_spec().qualified_name().to_string(),
        )),
    }
}
