//! Comparison and Equality Operator Tests
//!
//! Tests for: `<`, `<=`, `>`, `>=`, `=`, `!=`, `~`, `!~`, including the
//! boundary between "no answer" (empty) and "not comparable" (error).

use octofhir_fhirpath_diagnostics::{Diagnostics, SourceLocation};
use octofhir_fhirpath_eval::{
    ComparisonOperator, DateLiteral, DateTimeLiteral, EmptyLiteral, EqualityOperator, EvalContext,
    EvalError, EvalResult, Evaluator, EvaluatorRef, MultiplicativeOperator, NumberLiteral,
    QuantityLiteral, StringLiteral, TimeLiteral,
};
use octofhir_fhirpath_system::SystemValue;

// ============================================================================
// Test Helpers
// ============================================================================

fn location() -> SourceLocation {
    SourceLocation::default()
}

fn number(text: &str) -> EvaluatorRef {
    let mut diagnostics = Diagnostics::new();
    let node = NumberLiteral::new(text, location(), &mut diagnostics);
    assert!(!diagnostics.has_errors());
    Box::new(node)
}

fn string(text: &str) -> EvaluatorRef {
    Box::new(StringLiteral::new(text))
}

fn date(text: &str) -> EvaluatorRef {
    let mut diagnostics = Diagnostics::new();
    let node = DateLiteral::new(text, location(), &mut diagnostics);
    assert!(!diagnostics.has_errors());
    Box::new(node)
}

fn datetime(text: &str) -> EvaluatorRef {
    let mut diagnostics = Diagnostics::new();
    let node = DateTimeLiteral::new(text, location(), &mut diagnostics);
    assert!(!diagnostics.has_errors());
    Box::new(node)
}

fn time(text: &str) -> EvaluatorRef {
    let mut diagnostics = Diagnostics::new();
    let node = TimeLiteral::new(text, location(), &mut diagnostics);
    assert!(!diagnostics.has_errors());
    Box::new(node)
}

fn quantity(text: &str) -> EvaluatorRef {
    let mut diagnostics = Diagnostics::new();
    let node = QuantityLiteral::new(text, location(), &mut diagnostics);
    assert!(!diagnostics.has_errors());
    Box::new(node)
}

fn empty() -> EvaluatorRef {
    Box::new(EmptyLiteral::new())
}

fn comparison(token: &str, left: EvaluatorRef, right: EvaluatorRef) -> EvaluatorRef {
    let mut diagnostics = Diagnostics::new();
    let node = ComparisonOperator::new(token, left, right, location(), &mut diagnostics);
    assert!(!diagnostics.has_errors());
    Box::new(node)
}

fn equality(token: &str, left: EvaluatorRef, right: EvaluatorRef) -> EvaluatorRef {
    let mut diagnostics = Diagnostics::new();
    let node = EqualityOperator::new(token, left, right, location(), &mut diagnostics);
    assert!(!diagnostics.has_errors());
    Box::new(node)
}

fn eval(node: &dyn Evaluator) -> EvalResult<Option<SystemValue>> {
    let mut ctx = EvalContext::default();
    let focus = ctx.collection();
    ctx.evaluate(node, &focus, None)
}

fn is_true(result: EvalResult<Option<SystemValue>>) -> bool {
    result.unwrap() == Some(SystemValue::Boolean(true))
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_comparison_against_a_computed_operand() {
    // 14 / 8 <= 1.75
    let mut diagnostics = Diagnostics::new();
    let ratio = MultiplicativeOperator::new(
        "/",
        number("14"),
        number("8"),
        location(),
        &mut diagnostics,
    );
    assert!(!diagnostics.has_errors());
    let node = comparison("<=", Box::new(ratio), number("1.75"));
    assert!(is_true(eval(&*node)));
}

#[test]
fn test_string_comparison_is_ordinal() {
    assert!(is_true(eval(&*comparison("<", string("abc"), string("abd")))));
    assert!(is_true(eval(&*comparison(">", string("b"), string("appendix")))));
}

#[test]
fn test_datetime_comparison_normalizes_offsets() {
    // 12:00+02:00 is the same instant as 10:00Z
    let node = comparison(
        ">",
        datetime("2018-10-01T12:00:00+02:00"),
        datetime("2018-10-01T09:59:59Z"),
    );
    assert!(is_true(eval(&*node)));
}

#[test]
fn test_date_orders_against_datetime_of_matching_precision() {
    // @2018-10-02 > @2018-10-01T
    let node = comparison(">", date("2018-10-02"), datetime("2018-10-01T"));
    assert!(is_true(eval(&*node)));
}

#[test]
fn test_date_against_finer_datetime_is_empty() {
    // The date reads as midnight at day precision, which cannot be
    // ordered against a second-precision instant.
    let node = comparison(">", date("2018-10-02"), datetime("2018-10-01T23:59:59Z"));
    assert_eq!(eval(&*node).unwrap(), None);
}

#[test]
fn test_time_comparison() {
    let node = comparison("<", time("07:30:00"), time("14:00:00"));
    assert!(is_true(eval(&*node)));
}

#[test]
fn test_quantity_comparison_across_units() {
    let node = comparison(">", quantity("1 'km'"), quantity("900 'm'"));
    assert!(is_true(eval(&*node)));
}

// ============================================================================
// Empty vs Error
// ============================================================================

#[test]
fn test_precision_mismatch_comparison_is_empty() {
    // @2018-10-01 >= @2018-09
    let node = comparison(">=", date("2018-10-01"), date("2018-09"));
    assert_eq!(eval(&*node).unwrap(), None);
}

#[test]
fn test_incomparable_kinds_abort_with_an_error() {
    // @2018-10-01 >= 10
    let node = comparison(">=", date("2018-10-01"), number("10"));
    assert!(matches!(
        eval(&*node).unwrap_err(),
        EvalError::NotComparable { .. }
    ));
}

#[test]
fn test_cross_family_quantity_comparison_is_empty() {
    let node = comparison("<", quantity("1 's'"), quantity("1 'm'"));
    assert_eq!(eval(&*node).unwrap(), None);
}

#[test]
fn test_empty_operand_makes_comparison_empty() {
    let node = comparison(">=", number("10"), empty());
    assert_eq!(eval(&*node).unwrap(), None);
}

// ============================================================================
// Equality and Equivalence
// ============================================================================

#[test]
fn test_equal_never_truncates_decimals() {
    // 64.1 = 64.12 is false, 64.1 ~ 64.12 is true
    assert_eq!(
        eval(&*equality("=", number("64.1"), number("64.12"))).unwrap(),
        Some(SystemValue::Boolean(false))
    );
    assert!(is_true(eval(&*equality("~", number("64.1"), number("64.12")))));
}

#[test]
fn test_integer_decimal_equality_is_numeric() {
    assert!(is_true(eval(&*equality("=", number("7"), number("7.0")))));
}

#[test]
fn test_equal_with_empty_is_empty_but_equivalence_decides() {
    assert_eq!(eval(&*equality("=", number("7"), empty())).unwrap(), None);
    assert_eq!(
        eval(&*equality("~", number("7"), empty())).unwrap(),
        Some(SystemValue::Boolean(false))
    );
    assert!(is_true(eval(&*equality("~", empty(), empty()))));
}

#[test]
fn test_quantity_equality_across_units() {
    assert!(is_true(eval(&*equality("=", quantity("1 'km'"), quantity("1000 'm'")))));
    assert_eq!(
        eval(&*equality("=", quantity("1 'km'"), quantity("1 'm'"))).unwrap(),
        Some(SystemValue::Boolean(false))
    );
}

#[test]
fn test_datetime_equal_requires_matching_precision() {
    let node = equality("=", datetime("2018-10-01T07:30"), datetime("2018-10-01T07:30:00"));
    assert_eq!(eval(&*node).unwrap(), Some(SystemValue::Boolean(false)));
}

#[test]
fn test_equivalence_bridges_date_and_midnight_datetime() {
    let node = equality("~", date("2018-10-01"), datetime("2018-10-01T00:00:00Z"));
    assert!(is_true(eval(&*node)));
}

#[test]
fn test_not_equivalent() {
    assert!(is_true(eval(&*equality("!~", string("abc"), string("def")))));
}
