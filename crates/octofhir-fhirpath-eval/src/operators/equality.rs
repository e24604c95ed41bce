//! Equality and equivalence operators
//!
//! `=` and `!=` are exact: integers and decimals compare numerically
//! without truncation, temporals must match in kind and precision, and
//! an empty operand makes the whole expression empty. `~` and `!~` are
//! the relaxed forms: decimals compare at the least fractional
//! precision, strings fold case and whitespace, and two empties are
//! equivalent to each other.
//!
//! Operands are not forced to singletons. A multi-item collection is a
//! legitimate operand here and compares pairwise in order, with a count
//! mismatch simply unequal.

use octofhir_fhirpath_diagnostics::{Diagnostics, SourceLocation, FP0015};
use octofhir_fhirpath_system::{Collection, SystemValue};

use crate::context::EvalContext;
use crate::error::{EvalError, EvalResult};
use crate::eval::{flatten_singleton, Evaluator, EvaluatorRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqualityOp {
    Equal,
    NotEqual,
    Equivalent,
    NotEquivalent,
}

impl EqualityOp {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "=" => Some(Self::Equal),
            "!=" => Some(Self::NotEqual),
            "~" => Some(Self::Equivalent),
            "!~" => Some(Self::NotEquivalent),
            _ => None,
        }
    }

    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::Equivalent => "~",
            Self::NotEquivalent => "!~",
        }
    }

    const fn negated(&self) -> bool {
        matches!(self, Self::NotEqual | Self::NotEquivalent)
    }
}

/// `left = right`, `left ~ right` and their negations
#[derive(Debug)]
pub struct EqualityOperator {
    op: Option<EqualityOp>,
    left: EvaluatorRef,
    right: EvaluatorRef,
}

impl EqualityOperator {
    pub fn new(
        token: &str,
        left: EvaluatorRef,
        right: EvaluatorRef,
        location: SourceLocation,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let op = EqualityOp::parse(token);
        if op.is_none() {
            diagnostics.add_error_with_code(
                FP0015,
                location.line,
                location.column,
                format!("unsupported equality operator '{token}'"),
            );
        }
        Self { op, left, right }
    }
}

impl Evaluator for EqualityOperator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext,
        focus: &Collection,
        this: Option<&SystemValue>,
    ) -> EvalResult<Option<SystemValue>> {
        let op = self
            .op
            .ok_or_else(|| EvalError::invalid_expression("equality operator failed to parse"))?;
        let left = flatten_singleton(ctx.evaluate(&*self.left, focus, this)?);
        let right = flatten_singleton(ctx.evaluate(&*self.right, focus, this)?);
        let outcome = match op {
            EqualityOp::Equal | EqualityOp::NotEqual => match (left, right) {
                (Some(left), Some(right)) => left.equal(&right),
                // Empty on either side means there is nothing to decide.
                _ => return Ok(None),
            },
            EqualityOp::Equivalent | EqualityOp::NotEquivalent => match (left, right) {
                (Some(left), Some(right)) => left.equivalent(&right),
                (None, None) => true,
                _ => false,
            },
        };
        Ok(Some(SystemValue::Boolean(outcome != op.negated())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::{
        DateLiteral, DateTimeLiteral, EmptyLiteral, NumberLiteral, QuantityLiteral, StringLiteral,
    };
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[derive(Debug)]
    struct Constant(SystemValue);

    impl Evaluator for Constant {
        fn evaluate(
            &self,
            _ctx: &mut EvalContext,
            _focus: &Collection,
            _this: Option<&SystemValue>,
        ) -> EvalResult<Option<SystemValue>> {
            Ok(Some(self.0.clone()))
        }
    }

    fn number(text: &str) -> EvaluatorRef {
        let mut diagnostics = Diagnostics::new();
        Box::new(NumberLiteral::new(text, SourceLocation::default(), &mut diagnostics))
    }

    fn string(text: &str) -> EvaluatorRef {
        Box::new(StringLiteral::new(text))
    }

    fn integers(values: &[i32]) -> EvaluatorRef {
        let mut collection = Collection::default();
        for value in values {
            collection.add(SystemValue::Integer(*value)).unwrap();
        }
        Box::new(Constant(SystemValue::Collection(collection)))
    }

    fn check(token: &str, left: EvaluatorRef, right: EvaluatorRef) -> Option<SystemValue> {
        let mut diagnostics = Diagnostics::new();
        let node =
            EqualityOperator::new(token, left, right, SourceLocation::default(), &mut diagnostics);
        assert!(!diagnostics.has_errors());
        let mut ctx = EvalContext::default();
        let focus = ctx.collection();
        ctx.evaluate(&node, &focus, None).unwrap()
    }

    #[rstest]
    #[case("=", "1", "1", true)]
    #[case("=", "1", "2", false)]
    #[case("!=", "1", "2", true)]
    #[case("=", "1", "1.0", true)]
    #[case("=", "64.1", "64.12", false)]
    #[case("~", "64.1", "64.12", true)]
    #[case("!~", "64.1", "64.12", false)]
    fn test_numeric_equality(
        #[case] token: &str,
        #[case] left: &str,
        #[case] right: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(
            check(token, number(left), number(right)),
            Some(SystemValue::Boolean(expected))
        );
    }

    #[test]
    fn test_equal_with_empty_operand_is_empty() {
        assert_eq!(check("=", number("1"), Box::new(EmptyLiteral::new())), None);
        assert_eq!(check("!=", Box::new(EmptyLiteral::new()), number("1")), None);
    }

    #[test]
    fn test_equivalence_treats_two_empties_as_same() {
        assert_eq!(
            check("~", Box::new(EmptyLiteral::new()), Box::new(EmptyLiteral::new())),
            Some(SystemValue::Boolean(true))
        );
        assert_eq!(
            check("~", number("1"), Box::new(EmptyLiteral::new())),
            Some(SystemValue::Boolean(false))
        );
        assert_eq!(
            check("!~", Box::new(EmptyLiteral::new()), number("1")),
            Some(SystemValue::Boolean(true))
        );
    }

    #[test]
    fn test_string_equivalence_folds_case_and_whitespace() {
        assert_eq!(
            check("~", string("Hello\t World"), string("hello world")),
            Some(SystemValue::Boolean(true))
        );
        assert_eq!(
            check("=", string("Hello World"), string("hello world")),
            Some(SystemValue::Boolean(false))
        );
    }

    #[test]
    fn test_date_equality_requires_matching_precision() {
        let mut diagnostics = Diagnostics::new();
        let full: EvaluatorRef =
            Box::new(DateLiteral::new("2018-03-01", SourceLocation::default(), &mut diagnostics));
        let partial: EvaluatorRef =
            Box::new(DateLiteral::new("2018-03", SourceLocation::default(), &mut diagnostics));
        assert!(!diagnostics.has_errors());
        assert_eq!(check("=", full, partial), Some(SystemValue::Boolean(false)));
    }

    #[test]
    fn test_date_is_equivalent_to_midnight_datetime() {
        let mut diagnostics = Diagnostics::new();
        let date: EvaluatorRef =
            Box::new(DateLiteral::new("2018-03-01", SourceLocation::default(), &mut diagnostics));
        let datetime: EvaluatorRef = Box::new(DateTimeLiteral::new(
            "2018-03-01T00:00:00Z",
            SourceLocation::default(),
            &mut diagnostics,
        ));
        assert!(!diagnostics.has_errors());
        assert_eq!(check("~", date, datetime), Some(SystemValue::Boolean(true)));
    }

    #[test]
    fn test_quantity_equal_across_convertible_units() {
        let mut diagnostics = Diagnostics::new();
        let days: EvaluatorRef =
            Box::new(QuantityLiteral::new("7 days", SourceLocation::default(), &mut diagnostics));
        let week: EvaluatorRef =
            Box::new(QuantityLiteral::new("1 week", SourceLocation::default(), &mut diagnostics));
        assert!(!diagnostics.has_errors());
        assert_eq!(check("=", days, week), Some(SystemValue::Boolean(true)));
    }

    #[test]
    fn test_collections_compare_pairwise_in_order() {
        assert_eq!(
            check("=", integers(&[1, 2, 3]), integers(&[1, 2, 3])),
            Some(SystemValue::Boolean(true))
        );
        assert_eq!(
            check("=", integers(&[1, 2, 3]), integers(&[1, 3, 2])),
            Some(SystemValue::Boolean(false))
        );
    }

    #[test]
    fn test_collection_count_mismatch_is_unequal_not_error() {
        assert_eq!(
            check("=", integers(&[1, 2]), integers(&[1, 2, 3])),
            Some(SystemValue::Boolean(false))
        );
    }

    #[test]
    fn test_single_item_collection_equals_bare_value() {
        assert_eq!(
            check("=", integers(&[5]), number("5")),
            Some(SystemValue::Boolean(true))
        );
    }

    #[test]
    fn test_unknown_token_records_diagnostic() {
        let mut diagnostics = Diagnostics::new();
        let node = EqualityOperator::new(
            "==",
            number("1"),
            number("1"),
            SourceLocation::point(3, 7),
            &mut diagnostics,
        );
        assert!(diagnostics.has_errors());
        let mut ctx = EvalContext::default();
        let focus = ctx.collection();
        let err = ctx.evaluate(&node, &focus, None).unwrap_err();
        assert!(matches!(err, EvalError::InvalidExpression { .. }));
    }
}
