//! FHIRPath value system and expression evaluation for Rust
//!
//! This crate bundles the FHIRPath core:
//! - The polymorphic system value model (Boolean, Integer, Decimal,
//!   String, Date, DateTime, Time, Quantity, Collection, Node) with its
//!   equality, equivalence and ordering contracts
//! - Exact-precision decimal semantics and temporal values with
//!   partial-precision rules
//! - The quantity algebra with unit conversion and granularity promotion
//! - Evaluator-tree execution with empty propagation and three-valued
//!   logic
//! - Construction-time diagnostics collection with error codes and
//!   source locations
//!
//! # Example
//!
//! ```ignore
//! use octofhir_fhirpath::{Diagnostics, EvalContext, SourceLocation};
//! use octofhir_fhirpath::eval::{ComparisonOperator, QuantityLiteral};
//!
//! // 1 'km' > 900 'm'
//! let mut diagnostics = Diagnostics::new();
//! let at = SourceLocation::default();
//! let left = Box::new(QuantityLiteral::new("1 'km'", at, &mut diagnostics));
//! let right = Box::new(QuantityLiteral::new("900 'm'", at, &mut diagnostics));
//! let expr = ComparisonOperator::new(">", left, right, at, &mut diagnostics);
//! assert!(!diagnostics.has_errors());
//!
//! let mut ctx = EvalContext::default();
//! let focus = ctx.collection();
//! let result = ctx.evaluate(&expr, &focus, None)?;
//! ```

// Re-export all public APIs from internal crates
pub use octofhir_fhirpath_diagnostics as diagnostics;
pub use octofhir_fhirpath_eval as eval;
pub use octofhir_fhirpath_system as system;

// Convenience re-exports
pub use octofhir_fhirpath_diagnostics::{Diagnostics, FhirPathError, SourceLocation};
pub use octofhir_fhirpath_eval::{EvalContext, EvalError, EvalResult, Evaluator, EvaluatorRef};
pub use octofhir_fhirpath_system::{Collection, ModelAdapter, SystemValue};
