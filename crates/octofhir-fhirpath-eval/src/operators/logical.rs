//! Boolean operators with three-valued logic
//!
//! `and`, `or`, `xor` and `implies` over Boolean-or-empty operands.
//! Empty plays the role of "unknown": a known operand can force the
//! result (`false and`, `true or`, antecedent `false`) even when the
//! other side is empty, otherwise emptiness wins. Both operands are
//! always evaluated, so an error on either side surfaces regardless of
//! what the other side would have decided.

use octofhir_fhirpath_diagnostics::{Diagnostics, SourceLocation, FP0015};
use octofhir_fhirpath_system::{Collection, SystemValue};

use crate::context::EvalContext;
use crate::error::{EvalError, EvalResult};
use crate::eval::{boolean_operand, Evaluator, EvaluatorRef};

/// `left and right`
///
/// Truth table:
/// | A     | B     | A and B |
/// |-------|-------|---------|
/// | true  | true  | true    |
/// | true  | false | false   |
/// | true  | empty | empty   |
/// | false | any   | false   |
/// | empty | true  | empty   |
/// | empty | false | false   |
/// | empty | empty | empty   |
#[derive(Debug)]
pub struct AndOperator {
    left: EvaluatorRef,
    right: EvaluatorRef,
}

impl AndOperator {
    pub fn new(left: EvaluatorRef, right: EvaluatorRef) -> Self {
        Self { left, right }
    }
}

impl Evaluator for AndOperator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext,
        focus: &Collection,
        this: Option<&SystemValue>,
    ) -> EvalResult<Option<SystemValue>> {
        let left = boolean_operand(ctx.evaluate(&*self.left, focus, this)?)?;
        let right = boolean_operand(ctx.evaluate(&*self.right, focus, this)?)?;
        let result = match (left, right) {
            // A known false forces the result even against empty.
            (Some(false), _) | (_, Some(false)) => Some(false),
            (Some(true), Some(true)) => Some(true),
            _ => None,
        };
        Ok(result.map(SystemValue::Boolean))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrOp {
    Or,
    Xor,
}

impl OrOp {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "or" => Some(Self::Or),
            "xor" => Some(Self::Xor),
            _ => None,
        }
    }

    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Or => "or",
            Self::Xor => "xor",
        }
    }
}

/// `left or right` and `left xor right`
///
/// Truth table:
/// | A     | B     | A or B | A xor B |
/// |-------|-------|--------|---------|
/// | true  | true  | true   | false   |
/// | true  | false | true   | true    |
/// | true  | empty | true   | empty   |
/// | false | true  | true   | true    |
/// | false | false | false  | false   |
/// | false | empty | empty  | empty   |
/// | empty | any   | *      | empty   |
///
/// (*) `empty or B` is true when B is true, empty otherwise.
#[derive(Debug)]
pub struct OrOperator {
    op: Option<OrOp>,
    left: EvaluatorRef,
    right: EvaluatorRef,
}

impl OrOperator {
    pub fn new(
        token: &str,
        left: EvaluatorRef,
        right: EvaluatorRef,
        location: SourceLocation,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let op = OrOp::parse(token);
        if op.is_none() {
            diagnostics.add_error_with_code(
                FP0015,
                location.line,
                location.column,
                format!("unsupported boolean operator '{token}'"),
            );
        }
        Self { op, left, right }
    }
}

impl Evaluator for OrOperator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext,
        focus: &Collection,
        this: Option<&SystemValue>,
    ) -> EvalResult<Option<SystemValue>> {
        let op = self
            .op
            .ok_or_else(|| EvalError::invalid_expression("boolean operator failed to parse"))?;
        let left = boolean_operand(ctx.evaluate(&*self.left, focus, this)?)?;
        let right = boolean_operand(ctx.evaluate(&*self.right, focus, this)?)?;
        let result = match op {
            OrOp::Or => match (left, right) {
                // A known true forces the result even against empty.
                (Some(true), _) | (_, Some(true)) => Some(true),
                (Some(false), Some(false)) => Some(false),
                _ => None,
            },
            // Exclusive or needs both sides known.
            OrOp::Xor => match (left, right) {
                (Some(a), Some(b)) => Some(a != b),
                _ => None,
            },
        };
        Ok(result.map(SystemValue::Boolean))
    }
}

/// `left implies right`
///
/// Truth table:
/// | A     | B     | A implies B |
/// |-------|-------|-------------|
/// | true  | true  | true        |
/// | true  | false | false       |
/// | true  | empty | empty       |
/// | false | any   | true        |
/// | empty | true  | true        |
/// | empty | false | empty       |
/// | empty | empty | empty       |
#[derive(Debug)]
pub struct ImpliesOperator {
    left: EvaluatorRef,
    right: EvaluatorRef,
}

impl ImpliesOperator {
    pub fn new(left: EvaluatorRef, right: EvaluatorRef) -> Self {
        Self { left, right }
    }
}

impl Evaluator for ImpliesOperator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext,
        focus: &Collection,
        this: Option<&SystemValue>,
    ) -> EvalResult<Option<SystemValue>> {
        let left = boolean_operand(ctx.evaluate(&*self.left, focus, this)?)?;
        let right = boolean_operand(ctx.evaluate(&*self.right, focus, this)?)?;
        let result = match (left, right) {
            // A false antecedent satisfies the implication outright.
            (Some(false), _) => Some(true),
            (Some(true), b) => b,
            (None, Some(true)) => Some(true),
            (None, _) => None,
        };
        Ok(result.map(SystemValue::Boolean))
    }
}
