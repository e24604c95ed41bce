//! Collection Operator Tests
//!
//! Tests for: union `|`, membership `in`/`contains`, and equality over
//! collections built by unions.

use octofhir_fhirpath_diagnostics::{Diagnostics, SourceLocation};
use octofhir_fhirpath_eval::{
    EmptyLiteral, EqualityOperator, EvalContext, EvalResult, Evaluator, EvaluatorRef,
    MembershipOperator, NumberLiteral, StringLiteral, UnionOperator,
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

fn empty() -> EvaluatorRef {
    Box::new(EmptyLiteral::new())
}

fn union(left: EvaluatorRef, right: EvaluatorRef) -> EvaluatorRef {
    Box::new(UnionOperator::new(left, right))
}

fn membership(token: &str, left: EvaluatorRef, right: EvaluatorRef) -> EvaluatorRef {
    let mut diagnostics = Diagnostics::new();
    let node = MembershipOperator::new(token, left, right, location(), &mut diagnostics);
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

fn items(result: Option<SystemValue>) -> Vec<SystemValue> {
    match result {
        Some(SystemValue::Collection(collection)) => collection.iter().cloned().collect(),
        Some(value) => vec![value],
        None => vec![],
    }
}

// ============================================================================
// Union
// ============================================================================

#[test]
fn test_union_chain_deduplicates() {
    // 10 | 12 | 11 | 10 has three distinct items
    let node = union(union(union(number("10"), number("12")), number("11")), number("10"));
    let result = items(eval(&*node).unwrap());
    assert_eq!(result.len(), 3);
    assert_eq!(
        result,
        vec![
            SystemValue::Integer(10),
            SystemValue::Integer(12),
            SystemValue::Integer(11),
        ]
    );
}

#[test]
fn test_union_deduplicates_numerically_across_kinds() {
    // 1 | 1.0 collapses because Equal is numeric across Integer/Decimal
    let node = union(number("1"), number("1.0"));
    assert_eq!(items(eval(&*node).unwrap()).len(), 1);
}

#[test]
fn test_union_with_empty_sides() {
    let node = union(empty(), union(number("5"), empty()));
    assert_eq!(items(eval(&*node).unwrap()), vec![SystemValue::Integer(5)]);

    let node = union(empty(), empty());
    assert_eq!(eval(&*node).unwrap(), None);
}

// ============================================================================
// Membership
// ============================================================================

#[test]
fn test_in_over_a_union() {
    let node = membership(
        "in",
        number("11"),
        union(union(number("10"), number("12")), number("11")),
    );
    assert_eq!(eval(&*node).unwrap(), Some(SystemValue::Boolean(true)));
}

#[test]
fn test_contains_over_a_union() {
    let node = membership(
        "contains",
        union(string("alpha"), string("beta")),
        string("gamma"),
    );
    assert_eq!(eval(&*node).unwrap(), Some(SystemValue::Boolean(false)));
}

#[test]
fn test_membership_empty_rules() {
    // empty item -> empty result
    let node = membership("in", empty(), union(number("1"), number("2")));
    assert_eq!(eval(&*node).unwrap(), None);

    // empty collection -> false
    let node = membership("in", number("1"), empty());
    assert_eq!(eval(&*node).unwrap(), Some(SystemValue::Boolean(false)));
}

// ============================================================================
// Equality over Collections
// ============================================================================

#[test]
fn test_union_equality_is_order_sensitive() {
    let node = equality(
        "=",
        union(number("1"), number("2")),
        union(number("1"), number("2")),
    );
    assert_eq!(eval(&*node).unwrap(), Some(SystemValue::Boolean(true)));

    let node = equality(
        "=",
        union(number("1"), number("2")),
        union(number("2"), number("1")),
    );
    assert_eq!(eval(&*node).unwrap(), Some(SystemValue::Boolean(false)));
}

#[test]
fn test_single_item_union_equals_bare_value() {
    let node = equality("=", union(number("7"), number("7")), number("7"));
    assert_eq!(eval(&*node).unwrap(), Some(SystemValue::Boolean(true)));
}
