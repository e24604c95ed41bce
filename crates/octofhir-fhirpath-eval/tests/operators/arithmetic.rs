//! Arithmetic Operator Tests
//!
//! Tests for: `+`, `-`, `*`, `/`, `div`, `mod`, `&`, unary polarity,
//! across integers, decimals, strings, quantities and temporals.

use octofhir_fhirpath_diagnostics::{Diagnostics, SourceLocation};
use octofhir_fhirpath_eval::{
    AdditiveOperator, DateLiteral, EmptyLiteral, EvalContext, EvalError, EvalResult, Evaluator,
    EvaluatorRef, MultiplicativeOperator, NumberLiteral, PolarityOperator, QuantityLiteral,
    StringLiteral,
};
use octofhir_fhirpath_system::{SystemDate, SystemQuantity, SystemValue};
use rust_decimal::Decimal;

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

fn quantity(text: &str) -> EvaluatorRef {
    let mut diagnostics = Diagnostics::new();
    let node = QuantityLiteral::new(text, location(), &mut diagnostics);
    assert!(!diagnostics.has_errors());
    Box::new(node)
}

fn date(text: &str) -> EvaluatorRef {
    let mut diagnostics = Diagnostics::new();
    let node = DateLiteral::new(text, location(), &mut diagnostics);
    assert!(!diagnostics.has_errors());
    Box::new(node)
}

fn empty() -> EvaluatorRef {
    Box::new(EmptyLiteral::new())
}

fn additive(token: &str, left: EvaluatorRef, right: EvaluatorRef) -> EvaluatorRef {
    let mut diagnostics = Diagnostics::new();
    let node = AdditiveOperator::new(token, left, right, location(), &mut diagnostics);
    assert!(!diagnostics.has_errors());
    Box::new(node)
}

fn multiplicative(token: &str, left: EvaluatorRef, right: EvaluatorRef) -> EvaluatorRef {
    let mut diagnostics = Diagnostics::new();
    let node = MultiplicativeOperator::new(token, left, right, location(), &mut diagnostics);
    assert!(!diagnostics.has_errors());
    Box::new(node)
}

fn eval(node: &dyn Evaluator) -> EvalResult<Option<SystemValue>> {
    let mut ctx = EvalContext::default();
    let focus = ctx.collection();
    ctx.evaluate(node, &focus, None)
}

fn decimal(text: &str) -> SystemValue {
    SystemValue::Decimal(Decimal::from_str_exact(text).unwrap())
}

// ============================================================================
// Numeric Arithmetic
// ============================================================================

#[test]
fn test_nested_addition_and_multiplication() {
    // (2 + 3) * 4
    let node = multiplicative("*", additive("+", number("2"), number("3")), number("4"));
    assert_eq!(eval(&*node).unwrap(), Some(SystemValue::Integer(20)));
}

#[test]
fn test_division_always_yields_decimal() {
    // 14 / 8
    let node = multiplicative("/", number("14"), number("8"));
    assert_eq!(eval(&*node).unwrap(), Some(decimal("1.75")));
}

#[test]
fn test_truncated_division() {
    // 18 div 8
    let node = multiplicative("div", number("18"), number("8"));
    assert_eq!(eval(&*node).unwrap(), Some(SystemValue::Integer(2)));
}

#[test]
fn test_modulo() {
    // 19 mod 8
    let node = multiplicative("mod", number("19"), number("8"));
    assert_eq!(eval(&*node).unwrap(), Some(SystemValue::Integer(3)));
}

#[test]
fn test_division_by_zero_is_empty_for_every_division_form() {
    for token in ["/", "div", "mod"] {
        let node = multiplicative(token, number("7"), number("0"));
        assert_eq!(eval(&*node).unwrap(), None, "{token} by integer zero");

        let node = multiplicative(token, number("7.5"), number("0.0"));
        assert_eq!(eval(&*node).unwrap(), None, "{token} by decimal zero");
    }
}

#[test]
fn test_mixed_integer_decimal_addition_is_decimal() {
    let node = additive("+", number("2"), number("0.5"));
    assert_eq!(eval(&*node).unwrap(), Some(decimal("2.5")));
}

#[test]
fn test_integer_overflow_is_an_error_not_wraparound() {
    let node = additive("+", number("2147483647"), number("1"));
    assert!(matches!(eval(&*node).unwrap_err(), EvalError::Overflow { .. }));
}

#[test]
fn test_polarity_negates_a_computed_value() {
    // -(2 + 3)
    let mut diagnostics = Diagnostics::new();
    let node = PolarityOperator::new(
        "-",
        additive("+", number("2"), number("3")),
        location(),
        &mut diagnostics,
    );
    assert!(!diagnostics.has_errors());
    assert_eq!(eval(&node).unwrap(), Some(SystemValue::Integer(-5)));
}

// ============================================================================
// Empty Propagation
// ============================================================================

#[test]
fn test_empty_operand_propagates_through_arithmetic() {
    let node = additive("+", number("1"), empty());
    assert_eq!(eval(&*node).unwrap(), None);

    let node = multiplicative("*", empty(), number("3"));
    assert_eq!(eval(&*node).unwrap(), None);
}

#[test]
fn test_string_plus_with_empty_is_empty() {
    // 'Test1' + {}
    let node = additive("+", string("Test1"), empty());
    assert_eq!(eval(&*node).unwrap(), None);
}

#[test]
fn test_ampersand_treats_empty_as_empty_string() {
    // 'Test1' & {} & 'Test2'
    let node = additive("&", additive("&", string("Test1"), empty()), string("Test2"));
    assert_eq!(
        eval(&*node).unwrap(),
        Some(SystemValue::String("Test1Test2".into()))
    );
}

// ============================================================================
// Quantity Arithmetic
// ============================================================================

#[test]
fn test_quantity_addition_promotes_to_finer_unit() {
    // 1 week + 6 days
    let node = additive("+", quantity("1 week"), quantity("6 days"));
    let expected = SystemQuantity::parse("13 days").unwrap();
    assert_eq!(eval(&*node).unwrap(), Some(SystemValue::Quantity(expected)));
}

#[test]
fn test_quantity_scaled_by_bare_number() {
    // 2 'm' * 3
    let node = multiplicative("*", quantity("2 'm'"), number("3"));
    let expected = SystemQuantity::parse("6 'm'").unwrap();
    assert_eq!(eval(&*node).unwrap(), Some(SystemValue::Quantity(expected)));
}

#[test]
fn test_quantity_division_by_zero_quantity_is_empty() {
    let node = multiplicative("/", quantity("4 'm'"), quantity("0 'm'"));
    assert_eq!(eval(&*node).unwrap(), None);
}

#[test]
fn test_cross_family_quantity_addition_is_an_error() {
    // 1 's' + 1 'm'
    let node = additive("+", quantity("1 's'"), quantity("1 'm'"));
    assert!(matches!(
        eval(&*node).unwrap_err(),
        EvalError::IncompatibleUnits { .. }
    ));
}

// ============================================================================
// Temporal Arithmetic
// ============================================================================

#[test]
fn test_date_plus_duration_chain() {
    // @2018-10-01 + 6 days + 1 week
    let node = additive(
        "+",
        additive("+", date("2018-10-01"), quantity("6 days")),
        quantity("1 week"),
    );
    let expected = SystemDate::parse("2018-10-14").unwrap();
    assert_eq!(eval(&*node).unwrap(), Some(SystemValue::Date(expected)));
}

#[test]
fn test_month_addition_clamps_to_month_end() {
    // @2019-01-31 + 1 month
    let node = additive("+", date("2019-01-31"), quantity("1 month"));
    let expected = SystemDate::parse("2019-02-28").unwrap();
    assert_eq!(eval(&*node).unwrap(), Some(SystemValue::Date(expected)));
}

#[test]
fn test_date_minus_duration() {
    // @2018-10-01 - 1 month
    let node = additive("-", date("2018-10-01"), quantity("1 month"));
    let expected = SystemDate::parse("2018-09-01").unwrap();
    assert_eq!(eval(&*node).unwrap(), Some(SystemValue::Date(expected)));
}

#[test]
fn test_date_plus_subday_duration_is_an_error() {
    // @2018-10-01 + 90 minutes
    let node = additive("+", date("2018-10-01"), quantity("90 minutes"));
    assert!(matches!(
        eval(&*node).unwrap_err(),
        EvalError::InvalidOperand { .. }
    ));
}

#[test]
fn test_date_accepts_ucum_spelling_of_calendar_units() {
    // @2018-10-01 + 2 'd'
    let node = additive("+", date("2018-10-01"), quantity("2 'd'"));
    let expected = SystemDate::parse("2018-10-03").unwrap();
    assert_eq!(eval(&*node).unwrap(), Some(SystemValue::Date(expected)));
}

#[test]
fn test_date_plus_non_temporal_quantity_is_an_error() {
    // @2018-10-01 + 2 'kg'
    let node = additive("+", date("2018-10-01"), quantity("2 'kg'"));
    assert!(matches!(
        eval(&*node).unwrap_err(),
        EvalError::InvalidOperand { .. }
    ));
}
