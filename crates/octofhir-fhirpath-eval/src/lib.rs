//! FHIRPath Expression Evaluation Engine
//!
//! This crate provides the evaluator-tree execution model for FHIRPath
//! expressions over the system value model. It implements:
//!
//! - **Literals**: Boolean, Integer, Decimal, String, Date, DateTime, Time,
//!   Quantity and the empty collection `{}`
//! - **Invocations**: `$this` and member navigation through a model adapter
//! - **Arithmetic Operators**: `+`, `-`, `*`, `/`, `div`, `mod`, `&` and
//!   unary polarity, dispatched across numbers, strings, quantities and
//!   temporals
//! - **Comparison Operators**: `<`, `<=`, `>`, `>=` with precision and
//!   unit-aware ordering
//! - **Equality Operators**: exact `=`/`!=` and relaxed `~`/`!~`
//! - **Boolean Operators**: `and`, `or`, `xor`, `implies` with three-valued
//!   logic
//! - **Collection Operators**: union `|` and membership `in`/`contains`
//!
//! # Example
//!
//! ```ignore
//! use octofhir_fhirpath_diagnostics::{Diagnostics, SourceLocation};
//! use octofhir_fhirpath_eval::{AdditiveOperator, EvalContext, NumberLiteral};
//!
//! let mut diagnostics = Diagnostics::new();
//! let left = Box::new(NumberLiteral::new("2", SourceLocation::default(), &mut diagnostics));
//! let right = Box::new(NumberLiteral::new("3", SourceLocation::default(), &mut diagnostics));
//! let sum = AdditiveOperator::new("+", left, right, SourceLocation::default(), &mut diagnostics);
//! assert!(!diagnostics.has_errors());
//!
//! let mut ctx = EvalContext::default();
//! let focus = ctx.collection();
//! let result = ctx.evaluate(&sum, &focus, None).unwrap();
//! ```
//!
//! # Architecture
//!
//! An external visitor maps every grammar production onto exactly one
//! node constructor. Construction never fails: a bad operator token or
//! malformed literal records a diagnostic and leaves a node that errors
//! when evaluated, so one pass over the source collects every problem.
//!
//! - [`Evaluator`]: the node contract, `evaluate(ctx, focus, this)`
//! - [`EvalContext`]: model adapter plus the recursion guard every
//!   parent-to-child call goes through
//! - `operators`: one module per precedence family
//!
//! # Result Channels
//!
//! Every evaluation distinguishes three outcomes, and they never merge:
//!
//! - a value: `Ok(Some(..))`
//! - the empty collection: `Ok(None)`, a normal silent outcome
//! - an evaluation error: `Err(..)`, fatal to the whole call

pub mod context;
pub mod error;
pub mod eval;
pub mod invocation;
pub mod literal;
pub mod operators;

// Re-export main types
pub use context::{EvalContext, DEFAULT_MAX_DEPTH};
pub use error::{EvalError, EvalResult};
pub use eval::{boolean_operand, flatten_singleton, singleton, to_collection, Evaluator, EvaluatorRef};
pub use invocation::{InvocationOperator, MemberInvocation, ThisInvocation};
pub use literal::{
    BooleanLiteral, DateLiteral, DateTimeLiteral, EmptyLiteral, NumberLiteral, QuantityLiteral,
    StringLiteral, TimeLiteral,
};

// Re-export the operator nodes
pub use operators::arithmetic::{
    AdditiveOp, AdditiveOperator, MultiplicativeOp, MultiplicativeOperator, PolarityOp,
    PolarityOperator,
};
pub use operators::collection::{MembershipOp, MembershipOperator, UnionOperator};
pub use operators::comparison::{ComparisonOp, ComparisonOperator};
pub use operators::equality::{EqualityOp, EqualityOperator};
pub use operators::logical::{AndOperator, ImpliesOperator, OrOp, OrOperator};
