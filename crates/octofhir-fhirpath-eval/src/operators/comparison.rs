//! Ordering comparison operators
//!
//! `<`, `<=`, `>`, `>=` over the orderable kinds. The three-way outcome
//! of [`SystemValue::compare`] maps onto the two result channels: a
//! computed ordering becomes a boolean, "no answer" (precision mismatch,
//! unconvertible units) becomes the empty result, and fundamentally
//! incomparable kinds abort with an error.

use log::debug;
use std::cmp::Ordering;

use octofhir_fhirpath_diagnostics::{Diagnostics, SourceLocation, FP0015};
use octofhir_fhirpath_system::{Collection, Comparison, SystemValue};

use crate::context::EvalContext;
use crate::error::{EvalError, EvalResult};
use crate::eval::{singleton, Evaluator, EvaluatorRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl ComparisonOp {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "<" => Some(Self::Less),
            "<=" => Some(Self::LessOrEqual),
            ">" => Some(Self::Greater),
            ">=" => Some(Self::GreaterOrEqual),
            _ => None,
        }
    }

    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
        }
    }

    /// Whether an ordering satisfies this operator
    pub const fn holds(&self, ordering: Ordering) -> bool {
        match self {
            Self::Less => matches!(ordering, Ordering::Less),
            Self::LessOrEqual => !matches!(ordering, Ordering::Greater),
            Self::Greater => matches!(ordering, Ordering::Greater),
            Self::GreaterOrEqual => !matches!(ordering, Ordering::Less),
        }
    }
}

/// `left < right` and friends
#[derive(Debug)]
pub struct ComparisonOperator {
    op: Option<ComparisonOp>,
    left: EvaluatorRef,
    right: EvaluatorRef,
}

impl ComparisonOperator {
    pub fn new(
        token: &str,
        left: EvaluatorRef,
        right: EvaluatorRef,
        location: SourceLocation,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let op = ComparisonOp::parse(token);
        if op.is_none() {
            diagnostics.add_error_with_code(
                FP0015,
                location.line,
                location.column,
                format!("unsupported comparison operator '{token}'"),
            );
        }
        Self { op, left, right }
    }
}

impl Evaluator for ComparisonOperator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext,
        focus: &Collection,
        this: Option<&SystemValue>,
    ) -> EvalResult<Option<SystemValue>> {
        let op = self
            .op
            .ok_or_else(|| EvalError::invalid_expression("comparison operator failed to parse"))?;
        let left = singleton(ctx.evaluate(&*self.left, focus, this)?)?;
        let right = singleton(ctx.evaluate(&*self.right, focus, this)?)?;
        let (Some(left), Some(right)) = (left, right) else {
            return Ok(None);
        };
        match left.compare(&right) {
            Comparison::Evaluated(ordering) => {
                Ok(Some(SystemValue::Boolean(op.holds(ordering))))
            }
            Comparison::Empty => {
                debug!(
                    "comparison {} {} {} has no answer, yielding empty",
                    left,
                    op.symbol(),
                    right
                );
                Ok(None)
            }
            Comparison::Inconvertible => Err(EvalError::not_comparable(
                left.data_type().qualified_name(),
                right.data_type().qualified_name(),
            )),
        }
    }
}
