//! Boolean Operator Tests
//!
//! Tests for: `and`, `or`, `xor`, `implies` composed over comparison and
//! equality subtrees, exercising three-valued logic end to end.

use octofhir_fhirpath_diagnostics::{Diagnostics, SourceLocation};
use octofhir_fhirpath_eval::{
    AndOperator, BooleanLiteral, ComparisonOperator, EmptyLiteral, EvalContext, EvalError,
    EvalResult, Evaluator, EvaluatorRef, ImpliesOperator, NumberLiteral, OrOperator,
    StringLiteral,
};
use octofhir_fhirpath_system::SystemValue;

// ============================================================================
// Test Helpers
// ============================================================================

fn location() -> SourceLocation {
    SourceLocation::default()
}

fn boolean(value: bool) -> EvaluatorRef {
    let mut diagnostics = Diagnostics::new();
    let node = BooleanLiteral::new(
        if value { "true" } else { "false" },
        location(),
        &mut diagnostics,
    );
    assert!(!diagnostics.has_errors());
    Box::new(node)
}

fn number(text: &str) -> EvaluatorRef {
    let mut diagnostics = Diagnostics::new();
    let node = NumberLiteral::new(text, location(), &mut diagnostics);
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

fn or_node(token: &str, left: EvaluatorRef, right: EvaluatorRef) -> EvaluatorRef {
    let mut diagnostics = Diagnostics::new();
    let node = OrOperator::new(token, left, right, location(), &mut diagnostics);
    assert!(!diagnostics.has_errors());
    Box::new(node)
}

fn eval(node: &dyn Evaluator) -> EvalResult<Option<SystemValue>> {
    let mut ctx = EvalContext::default();
    let focus = ctx.collection();
    ctx.evaluate(node, &focus, None)
}

// ============================================================================
// Composition with Comparisons
// ============================================================================

#[test]
fn test_and_over_comparisons() {
    // (1 < 2) and (3 > 2)
    let node = AndOperator::new(
        comparison("<", number("1"), number("2")),
        comparison(">", number("3"), number("2")),
    );
    assert_eq!(eval(&node).unwrap(), Some(SystemValue::Boolean(true)));
}

#[test]
fn test_empty_comparison_feeds_three_valued_and() {
    // (10 >= {}) evaluates to empty; false and empty is still false
    let node = AndOperator::new(
        boolean(false),
        comparison(">=", number("10"), empty()),
    );
    assert_eq!(eval(&node).unwrap(), Some(SystemValue::Boolean(false)));

    // but true and empty is empty
    let node = AndOperator::new(
        boolean(true),
        comparison(">=", number("10"), empty()),
    );
    assert_eq!(eval(&node).unwrap(), None);
}

#[test]
fn test_empty_feeds_or_and_true_dominates() {
    // (empty) or true
    let node = or_node("or", comparison(">=", number("10"), empty()), boolean(true));
    assert_eq!(eval(&*node).unwrap(), Some(SystemValue::Boolean(true)));

    // (empty) or false
    let node = or_node("or", comparison(">=", number("10"), empty()), boolean(false));
    assert_eq!(eval(&*node).unwrap(), None);
}

#[test]
fn test_nested_three_valued_chain() {
    // (true and {}) or true
    let node = or_node("or", Box::new(AndOperator::new(boolean(true), empty())), boolean(true));
    assert_eq!(eval(&*node).unwrap(), Some(SystemValue::Boolean(true)));
}

#[test]
fn test_xor_requires_both_sides_known() {
    let node = or_node("xor", boolean(true), boolean(false));
    assert_eq!(eval(&*node).unwrap(), Some(SystemValue::Boolean(true)));

    let node = or_node("xor", boolean(true), empty());
    assert_eq!(eval(&*node).unwrap(), None);
}

#[test]
fn test_implies_with_empty_antecedent() {
    // {} implies true is true, {} implies false is empty
    let node = ImpliesOperator::new(empty(), boolean(true));
    assert_eq!(eval(&node).unwrap(), Some(SystemValue::Boolean(true)));

    let node = ImpliesOperator::new(empty(), boolean(false));
    assert_eq!(eval(&node).unwrap(), None);
}

#[test]
fn test_false_implies_anything_is_true() {
    let node = ImpliesOperator::new(boolean(false), empty());
    assert_eq!(eval(&node).unwrap(), Some(SystemValue::Boolean(true)));
}

// ============================================================================
// Errors Through Boolean Context
// ============================================================================

#[test]
fn test_comparison_error_propagates_through_and() {
    // (@date >= 10) is an error; the and cannot rescue it
    let mut diagnostics = Diagnostics::new();
    let date = octofhir_fhirpath_eval::DateLiteral::new("2018-10-01", location(), &mut diagnostics);
    assert!(!diagnostics.has_errors());
    let node = AndOperator::new(
        boolean(false),
        comparison(">=", Box::new(date), number("10")),
    );
    assert!(matches!(
        eval(&node).unwrap_err(),
        EvalError::NotComparable { .. }
    ));
}

#[test]
fn test_string_operand_is_rejected() {
    let node = AndOperator::new(Box::new(StringLiteral::new("yes")), boolean(true));
    assert!(matches!(
        eval(&node).unwrap_err(),
        EvalError::TypeMismatch { .. }
    ));
}
