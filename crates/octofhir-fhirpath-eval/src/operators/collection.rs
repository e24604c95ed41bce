//! Collection operators
//!
//! `|` merges two operands into one deduplicated collection, preserving
//! first-occurrence order. `in` and `contains` are the two spellings of
//! membership, differing only in which side names the collection.

use octofhir_fhirpath_diagnostics::{Diagnostics, SourceLocation, FP0015};
use octofhir_fhirpath_system::{Collection, SystemValue};

use crate::context::EvalContext;
use crate::error::{EvalError, EvalResult};
use crate::eval::{singleton, to_collection, Evaluator, EvaluatorRef};

/// `left | right`
///
/// Order is left operand first, then right, with items already seen
/// skipped by exact equality. `10 | 12 | 11 | 10` yields `{10, 12, 11}`.
#[derive(Debug)]
pub struct UnionOperator {
    left: EvaluatorRef,
    right: EvaluatorRef,
}

impl UnionOperator {
    pub fn new(left: EvaluatorRef, right: EvaluatorRef) -> Self {
        Self { left, right }
    }
}

impl Evaluator for UnionOperator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext,
        focus: &Collection,
        this: Option<&SystemValue>,
    ) -> EvalResult<Option<SystemValue>> {
        let left = ctx.evaluate(&*self.left, focus, this)?;
        let left = to_collection(ctx, left)?;
        let right = ctx.evaluate(&*self.right, focus, this)?;
        let right = to_collection(ctx, right)?;
        let mut merged = ctx.collection();
        merged.add_all_unique(&left)?;
        merged.add_all_unique(&right)?;
        if merged.is_empty() {
            Ok(None)
        } else {
            Ok(Some(SystemValue::Collection(merged)))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipOp {
    /// `item in collection`
    In,
    /// `collection contains item`
    Contains,
}

impl MembershipOp {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "in" => Some(Self::In),
            "contains" => Some(Self::Contains),
            _ => None,
        }
    }

    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Contains => "contains",
        }
    }
}

/// `item in collection` / `collection contains item`
///
/// An empty item makes the result empty; an empty collection makes it
/// false. The item side must be a singleton, the scan uses exact
/// equality.
#[derive(Debug)]
pub struct MembershipOperator {
    op: Option<MembershipOp>,
    left: EvaluatorRef,
    right: EvaluatorRef,
}

impl MembershipOperator {
    pub fn new(
        token: &str,
        left: EvaluatorRef,
        right: EvaluatorRef,
        location: SourceLocation,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let op = MembershipOp::parse(token);
        if op.is_none() {
            diagnostics.add_error_with_code(
                FP0015,
                location.line,
                location.column,
                format!("unsupported membership operator '{token}'"),
            );
        }
        Self { op, left, right }
    }
}

impl Evaluator for MembershipOperator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext,
        focus: &Collection,
        this: Option<&SystemValue>,
    ) -> EvalResult<Option<SystemValue>> {
        let op = self
            .op
            .ok_or_else(|| EvalError::invalid_expression("membership operator failed to parse"))?;
        let left = ctx.evaluate(&*self.left, focus, this)?;
        let right = ctx.evaluate(&*self.right, focus, this)?;
        let (item, haystack) = match op {
            MembershipOp::In => (singleton(left)?, to_collection(ctx, right)?),
            MembershipOp::Contains => (singleton(right)?, to_collection(ctx, left)?),
        };
        let Some(item) = item else {
            return Ok(None);
        };
        Ok(Some(SystemValue::Boolean(haystack.contains(&item))))
    }
}
