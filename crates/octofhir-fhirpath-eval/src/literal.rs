//! Literal evaluator nodes
//!
//! Literals are parsed once at construction time. A malformed token is
//! recorded in the diagnostic collector with its source position and
//! construction continues; the resulting node refuses to evaluate, which
//! only matters if a caller ignores `has_errors` on the collector.

use octofhir_fhirpath_diagnostics::{Diagnostics, SourceLocation, FP0001, FP0002, FP0003, FP0004};
use octofhir_fhirpath_system::{
    parse_decimal, Collection, SystemDate, SystemDateTime, SystemQuantity, SystemTime, SystemValue,
};

use crate::context::EvalContext;
use crate::error::{EvalError, EvalResult};
use crate::eval::Evaluator;

fn evaluate_parsed(value: &Option<SystemValue>) -> EvalResult<Option<SystemValue>> {
    match value {
        Some(value) => Ok(Some(value.clone())),
        None => Err(EvalError::invalid_expression(
            "literal failed to parse during construction",
        )),
    }
}

/// `true` or `false`
#[derive(Debug)]
pub struct BooleanLiteral {
    value: Option<SystemValue>,
}

impl BooleanLiteral {
    pub fn new(token: &str, location: SourceLocation, diagnostics: &mut Diagnostics) -> Self {
        let value = match token {
            "true" => Some(SystemValue::Boolean(true)),
            "false" => Some(SystemValue::Boolean(false)),
            other => {
                diagnostics.add_error_with_code(
                    FP0001,
                    location.line,
                    location.column,
                    format!("invalid boolean literal '{other}'"),
                );
                None
            }
        };
        Self { value }
    }
}

impl Evaluator for BooleanLiteral {
    fn evaluate(
        &self,
        _ctx: &mut EvalContext,
        _focus: &Collection,
        _this: Option<&SystemValue>,
    ) -> EvalResult<Option<SystemValue>> {
        evaluate_parsed(&self.value)
    }
}

/// Integer or decimal number. Tokens without a fraction become Integer;
/// anything else becomes Decimal with its written scale.
#[derive(Debug)]
pub struct NumberLiteral {
    value: Option<SystemValue>,
}

impl NumberLiteral {
    pub fn new(token: &str, location: SourceLocation, diagnostics: &mut Diagnostics) -> Self {
        let value = if token.contains('.') {
            parse_decimal(token).map(SystemValue::Decimal)
        } else {
            token.parse::<i32>().ok().map(SystemValue::Integer)
        };
        if value.is_none() {
            diagnostics.add_error_with_code(
                FP0002,
                location.line,
                location.column,
                format!("invalid number literal '{token}'"),
            );
        }
        Self { value }
    }
}

impl Evaluator for NumberLiteral {
    fn evaluate(
        &self,
        _ctx: &mut EvalContext,
        _focus: &Collection,
        _this: Option<&SystemValue>,
    ) -> EvalResult<Option<SystemValue>> {
        evaluate_parsed(&self.value)
    }
}

/// String literal; escape handling happens upstream in the parser.
#[derive(Debug)]
pub struct StringLiteral {
    value: SystemValue,
}

impl StringLiteral {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            value: SystemValue::String(text.into()),
        }
    }
}

impl Evaluator for StringLiteral {
    fn evaluate(
        &self,
        _ctx: &mut EvalContext,
        _focus: &Collection,
        _this: Option<&SystemValue>,
    ) -> EvalResult<Option<SystemValue>> {
        Ok(Some(self.value.clone()))
    }
}

/// Date literal in `YYYY[-MM[-DD]]` form
#[derive(Debug)]
pub struct DateLiteral {
    value: Option<SystemValue>,
}

impl DateLiteral {
    pub fn new(token: &str, location: SourceLocation, diagnostics: &mut Diagnostics) -> Self {
        let value = SystemDate::parse(token).map(SystemValue::Date);
        if value.is_none() {
            diagnostics.add_error_with_code(
                FP0003,
                location.line,
                location.column,
                format!("invalid date literal '{token}'"),
            );
        }
        Self { value }
    }
}

impl Evaluator for DateLiteral {
    fn evaluate(
        &self,
        _ctx: &mut EvalContext,
        _focus: &Collection,
        _this: Option<&SystemValue>,
    ) -> EvalResult<Option<SystemValue>> {
        evaluate_parsed(&self.value)
    }
}

/// DateTime literal: a date, `T`, an optional time and an optional zone
#[derive(Debug)]
pub struct DateTimeLiteral {
    value: Option<SystemValue>,
}

impl DateTimeLiteral {
    pub fn new(token: &str, location: SourceLocation, diagnostics: &mut Diagnostics) -> Self {
        let value = SystemDateTime::parse(token).map(SystemValue::DateTime);
        if value.is_none() {
            diagnostics.add_error_with_code(
                FP0003,
                location.line,
                location.column,
                format!("invalid datetime literal '{token}'"),
            );
        }
        Self { value }
    }
}

impl Evaluator for DateTimeLiteral {
    fn evaluate(
        &self,
        _ctx: &mut EvalContext,
        _focus: &Collection,
        _this: Option<&SystemValue>,
    ) -> EvalResult<Option<SystemValue>> {
        evaluate_parsed(&self.value)
    }
}

/// Time literal in `HH[:MM[:SS[.fff]]]` form
#[derive(Debug)]
pub struct TimeLiteral {
    value: Option<SystemValue>,
}

impl TimeLiteral {
    pub fn new(token: &str, location: SourceLocation, diagnostics: &mut Diagnostics) -> Self {
        let value = SystemTime::parse(token).map(SystemValue::Time);
        if value.is_none() {
            diagnostics.add_error_with_code(
                FP0003,
                location.line,
                location.column,
                format!("invalid time literal '{token}'"),
            );
        }
        Self { value }
    }
}

impl Evaluator for TimeLiteral {
    fn evaluate(
        &self,
        _ctx: &mut EvalContext,
        _focus: &Collection,
        _this: Option<&SystemValue>,
    ) -> EvalResult<Option<SystemValue>> {
        evaluate_parsed(&self.value)
    }
}

/// Quantity literal: a number followed by a calendar word or quoted code
#[derive(Debug)]
pub struct QuantityLiteral {
    value: Option<SystemValue>,
}

impl QuantityLiteral {
    pub fn new(token: &str, location: SourceLocation, diagnostics: &mut Diagnostics) -> Self {
        let value = SystemQuantity::parse(token).map(SystemValue::Quantity);
        if value.is_none() {
            diagnostics.add_error_with_code(
                FP0004,
                location.line,
                location.column,
                format!("invalid quantity literal '{token}'"),
            );
        }
        Self { value }
    }
}

impl Evaluator for QuantityLiteral {
    fn evaluate(
        &self,
        _ctx: &mut EvalContext,
        _focus: &Collection,
        _this: Option<&SystemValue>,
    ) -> EvalResult<Option<SystemValue>> {
        evaluate_parsed(&self.value)
    }
}

/// The `{}` literal, which always yields the empty result.
#[derive(Debug, Default)]
pub struct EmptyLiteral;

impl EmptyLiteral {
    pub fn new() -> Self {
        Self
    }
}

impl Evaluator for EmptyLiteral {
    fn evaluate(
        &self,
        _ctx: &mut EvalContext,
        _focus: &Collection,
        _this: Option<&SystemValue>,
    ) -> EvalResult<Option<SystemValue>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn eval(node: &dyn Evaluator) -> EvalResult<Option<SystemValue>> {
        let mut ctx = EvalContext::default();
        let focus = ctx.collection();
        ctx.evaluate(node, &focus, None)
    }

    #[rstest]
    #[case("14", SystemValue::Integer(14))]
    #[case("14.25", SystemValue::Decimal("14.25".parse().unwrap()))]
    #[case("0.1", SystemValue::Decimal("0.1".parse().unwrap()))]
    fn test_number_literal(#[case] token: &str, #[case] expected: SystemValue) {
        let mut diagnostics = Diagnostics::new();
        let node = NumberLiteral::new(token, SourceLocation::default(), &mut diagnostics);
        assert!(!diagnostics.has_errors());
        assert_eq!(eval(&node).unwrap(), Some(expected));
    }

    #[test]
    fn test_number_literal_out_of_range() {
        let mut diagnostics = Diagnostics::new();
        let node = NumberLiteral::new(
            "2147483648",
            SourceLocation::new(1, 5, 4, 10),
            &mut diagnostics,
        );
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.items()[0].code, FP0002);
        assert!(eval(&node).is_err());
    }

    #[test]
    fn test_construction_keeps_accumulating() {
        let mut diagnostics = Diagnostics::new();
        let _ = DateLiteral::new("20x8", SourceLocation::new(1, 1, 0, 4), &mut diagnostics);
        let _ = TimeLiteral::new("25:00", SourceLocation::new(1, 9, 8, 5), &mut diagnostics);
        let _ = QuantityLiteral::new("4 xx", SourceLocation::new(1, 17, 16, 4), &mut diagnostics);
        assert_eq!(diagnostics.len(), 3);
        let codes: Vec<_> = diagnostics.items().iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![FP0003, FP0003, FP0004]);
    }

    #[test]
    fn test_temporal_literals_round_trip() {
        let mut diagnostics = Diagnostics::new();
        let node = DateTimeLiteral::new(
            "2018-10-01T07:30:00Z",
            SourceLocation::default(),
            &mut diagnostics,
        );
        assert!(!diagnostics.has_errors());
        let value = eval(&node).unwrap().unwrap();
        assert_eq!(value.to_string(), "2018-10-01T07:30:00Z");
    }

    #[test]
    fn test_empty_literal() {
        assert_eq!(eval(&EmptyLiteral::new()).unwrap(), None);
    }

    #[test]
    fn test_string_literal_is_verbatim() {
        let node = StringLiteral::new("  Test  Under ");
        assert_eq!(
            eval(&node).unwrap(),
            Some(SystemValue::String("  Test  Under ".to_string()))
        );
    }
}
