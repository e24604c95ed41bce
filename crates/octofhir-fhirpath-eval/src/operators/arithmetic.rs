//! Arithmetic operators
//!
//! Implements the additive family (`+`, `-`, `&`), the multiplicative
//! family (`*`, `/`, `div`, `mod`) and unary polarity. Integer pairs stay
//! integral except for `/`, which always divides as decimals. Division,
//! integer division, and modulo by zero yield the empty result, never an
//! error. A bare number paired with a quantity inherits the quantity's
//! unit; a quantity added to a date, datetime, or time must carry a
//! calendar unit the receiver supports.

use log::debug;

use octofhir_fhirpath_diagnostics::{Diagnostics, SourceLocation, FP0015};
use octofhir_fhirpath_system::{CalendarUnit, Collection, SystemQuantity, SystemValue};

use crate::context::EvalContext;
use crate::error::{EvalError, EvalResult};
use crate::eval::{singleton, Evaluator, EvaluatorRef};

/// Qualified type names of both operands, for error messages
pub(crate) fn operand_types(left: &SystemValue, right: &SystemValue) -> String {
    format!(
        "{}, {}",
        left.data_type().qualified_name(),
        right.data_type().qualified_name()
    )
}

/// The calendar unit of a quantity being added to a temporal value
fn calendar_unit(quantity: &SystemQuantity, operator: &str) -> EvalResult<CalendarUnit> {
    if quantity.exp() != 1 {
        return Err(EvalError::invalid_operand(
            operator,
            format!("unit exponent {} has no calendar meaning", quantity.exp()),
        ));
    }
    quantity
        .unit()
        .and_then(CalendarUnit::from_token)
        .ok_or_else(|| {
            EvalError::invalid_operand(
                operator,
                format!(
                    "unit '{}' is not a calendar duration",
                    quantity.unit().unwrap_or("1")
                ),
            )
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdditiveOp {
    Add,
    Subtract,
    Concat,
}

impl AdditiveOp {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "+" => Some(Self::Add),
            "-" => Some(Self::Subtract),
            "&" => Some(Self::Concat),
            _ => None,
        }
    }

    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Concat => "&",
        }
    }
}

/// `left + right`, `left - right`, or `left & right`
#[derive(Debug)]
pub struct AdditiveOperator {
    op: Option<AdditiveOp>,
    left: EvaluatorRef,
    right: EvaluatorRef,
}

impl AdditiveOperator {
    pub fn new(
        token: &str,
        left: EvaluatorRef,
        right: EvaluatorRef,
        location: SourceLocation,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let op = AdditiveOp::parse(token);
        if op.is_none() {
            diagnostics.add_error_with_code(
                FP0015,
                location.line,
                location.column,
                format!("unsupported additive operator '{token}'"),
            );
        }
        Self { op, left, right }
    }
}

impl Evaluator for AdditiveOperator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext,
        focus: &Collection,
        this: Option<&SystemValue>,
    ) -> EvalResult<Option<SystemValue>> {
        let op = self
            .op
            .ok_or_else(|| EvalError::invalid_expression("additive operator failed to parse"))?;
        let left = singleton(ctx.evaluate(&*self.left, focus, this)?)?;
        let right = singleton(ctx.evaluate(&*self.right, focus, this)?)?;

        if op == AdditiveOp::Concat {
            return concat(left.as_ref(), right.as_ref()).map(Some);
        }
        let (Some(left), Some(right)) = (left, right) else {
            return Ok(None);
        };
        match op {
            AdditiveOp::Add => add(&left, &right).map(Some),
            AdditiveOp::Subtract => subtract(&left, &right).map(Some),
            AdditiveOp::Concat => unreachable!("handled above"),
        }
    }
}

/// `&` treats an empty operand as the empty string.
fn concat<'a>(
    left: Option<&'a SystemValue>,
    right: Option<&'a SystemValue>,
) -> EvalResult<SystemValue> {
    let part = |value: Option<&'a SystemValue>| -> EvalResult<&'a str> {
        match value {
            None => Ok(""),
            Some(SystemValue::String(s)) => Ok(s),
            Some(other) => Err(EvalError::type_mismatch(
                "System.String",
                other.data_type().qualified_name(),
            )),
        }
    };
    Ok(SystemValue::String(format!("{}{}", part(left)?, part(right)?)))
}

fn add(left: &SystemValue, right: &SystemValue) -> EvalResult<SystemValue> {
    use SystemValue::*;
    match (left, right) {
        (Integer(a), Integer(b)) => a
            .checked_add(*b)
            .map(Integer)
            .ok_or_else(|| EvalError::overflow("addition")),
        (Decimal(a), Decimal(b)) => a
            .checked_add(*b)
            .map(Decimal)
            .ok_or_else(|| EvalError::overflow("addition")),
        (Integer(a), Decimal(b)) => rust_decimal::Decimal::from(*a)
            .checked_add(*b)
            .map(Decimal)
            .ok_or_else(|| EvalError::overflow("addition")),
        (Decimal(a), Integer(b)) => a
            .checked_add(rust_decimal::Decimal::from(*b))
            .map(Decimal)
            .ok_or_else(|| EvalError::overflow("addition")),
        (String(a), String(b)) => Ok(String(format!("{a}{b}"))),
        (Quantity(a), Quantity(b)) => Ok(Quantity(a.add(b)?)),
        (Quantity(a), Integer(_) | Decimal(_)) => match right.to_decimal() {
            Some(b) => Ok(Quantity(a.add(&SystemQuantity::unitless(b))?)),
            None => Err(EvalError::unsupported_operator("+", operand_types(left, right))),
        },
        (Integer(_) | Decimal(_), Quantity(b)) => match left.to_decimal() {
            Some(a) => Ok(Quantity(SystemQuantity::unitless(a).add(b)?)),
            None => Err(EvalError::unsupported_operator("+", operand_types(left, right))),
        },
        (Date(d), Quantity(q)) => {
            let unit = calendar_unit(q, "+")?;
            Ok(Date(d.add_quantity(&q.value(), unit)?))
        }
        (DateTime(dt), Quantity(q)) => {
            let unit = calendar_unit(q, "+")?;
            Ok(DateTime(dt.add_quantity(&q.value(), unit)?))
        }
        (Time(t), Quantity(q)) => {
            let unit = calendar_unit(q, "+")?;
            Ok(Time(t.add_quantity(&q.value(), unit)?))
        }
        _ => Err(EvalError::unsupported_operator(
            "+",
            operand_types(left, right),
        )),
    }
}

fn subtract(left: &SystemValue, right: &SystemValue) -> EvalResult<SystemValue> {
    use SystemValue::*;
    match (left, right) {
        (Integer(a), Integer(b)) => a
            .checked_sub(*b)
            .map(Integer)
            .ok_or_else(|| EvalError::overflow("subtraction")),
        (Decimal(a), Decimal(b)) => a
            .checked_sub(*b)
            .map(Decimal)
            .ok_or_else(|| EvalError::overflow("subtraction")),
        (Integer(a), Decimal(b)) => rust_decimal::Decimal::from(*a)
            .checked_sub(*b)
            .map(Decimal)
            .ok_or_else(|| EvalError::overflow("subtraction")),
        (Decimal(a), Integer(b)) => a
            .checked_sub(rust_decimal::Decimal::from(*b))
            .map(Decimal)
            .ok_or_else(|| EvalError::overflow("subtraction")),
        (Quantity(a), Quantity(b)) => Ok(Quantity(a.sub(b)?)),
        (Quantity(a), Integer(_) | Decimal(_)) => match right.to_decimal() {
            Some(b) => Ok(Quantity(a.sub(&SystemQuantity::unitless(b))?)),
            None => Err(EvalError::unsupported_operator("-", operand_types(left, right))),
        },
        (Integer(_) | Decimal(_), Quantity(b)) => match left.to_decimal() {
            Some(a) => Ok(Quantity(SystemQuantity::unitless(a).sub(b)?)),
            None => Err(EvalError::unsupported_operator("-", operand_types(left, right))),
        },
        (Date(d), Quantity(q)) => {
            let unit = calendar_unit(q, "-")?;
            Ok(Date(d.add_quantity(&-q.value(), unit)?))
        }
        (DateTime(dt), Quantity(q)) => {
            let unit = calendar_unit(q, "-")?;
            Ok(DateTime(dt.add_quantity(&-q.value(), unit)?))
        }
        (Time(t), Quantity(q)) => {
            let unit = calendar_unit(q, "-")?;
            Ok(Time(t.add_quantity(&-q.value(), unit)?))
        }
        _ => Err(EvalError::unsupported_operator(
            "-",
            operand_types(left, right),
        )),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiplicativeOp {
    Multiply,
    Divide,
    IntegerDivide,
    Modulo,
}

impl MultiplicativeOp {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "*" => Some(Self::Multiply),
            "/" => Some(Self::Divide),
            "div" => Some(Self::IntegerDivide),
            "mod" => Some(Self::Modulo),
            _ => None,
        }
    }

    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::IntegerDivide => "div",
            Self::Modulo => "mod",
        }
    }
}

/// `left * right`, `left / right`, `left div right`, or `left mod right`
#[derive(Debug)]
pub struct MultiplicativeOperator {
    op: Option<MultiplicativeOp>,
    left: EvaluatorRef,
    right: EvaluatorRef,
}

impl MultiplicativeOperator {
    pub fn new(
        token: &str,
        left: EvaluatorRef,
        right: EvaluatorRef,
        location: SourceLocation,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let op = MultiplicativeOp::parse(token);
        if op.is_none() {
            diagnostics.add_error_with_code(
                FP0015,
                location.line,
                location.column,
                format!("unsupported multiplicative operator '{token}'"),
            );
        }
        Self { op, left, right }
    }
}

impl Evaluator for MultiplicativeOperator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext,
        focus: &Collection,
        this: Option<&SystemValue>,
    ) -> EvalResult<Option<SystemValue>> {
        let op = self.op.ok_or_else(|| {
            EvalError::invalid_expression("multiplicative operator failed to parse")
        })?;
        let left = singleton(ctx.evaluate(&*self.left, focus, this)?)?;
        let right = singleton(ctx.evaluate(&*self.right, focus, this)?)?;
        let (Some(left), Some(right)) = (left, right) else {
            return Ok(None);
        };

        if op != MultiplicativeOp::Multiply && divisor_is_zero(&right) {
            debug!("{} by zero yields empty", op.symbol());
            return Ok(None);
        }
        match op {
            MultiplicativeOp::Multiply => multiply(&left, &right).map(Some),
            MultiplicativeOp::Divide => divide(&left, &right).map(Some),
            MultiplicativeOp::IntegerDivide => integer_divide(&left, &right).map(Some),
            MultiplicativeOp::Modulo => modulo(&left, &right).map(Some),
        }
    }
}

fn divisor_is_zero(value: &SystemValue) -> bool {
    match value {
        SystemValue::Integer(i) => *i == 0,
        SystemValue::Decimal(d) => d.is_zero(),
        SystemValue::Quantity(q) => q.value().is_zero(),
        _ => false,
    }
}

fn multiply(left: &SystemValue, right: &SystemValue) -> EvalResult<SystemValue> {
    use SystemValue::*;
    match (left, right) {
        (Integer(a), Integer(b)) => a
            .checked_mul(*b)
            .map(Integer)
            .ok_or_else(|| EvalError::overflow("multiplication")),
        (Decimal(a), Decimal(b)) => a
            .checked_mul(*b)
            .map(Decimal)
            .ok_or_else(|| EvalError::overflow("multiplication")),
        (Integer(a), Decimal(b)) => rust_decimal::Decimal::from(*a)
            .checked_mul(*b)
            .map(Decimal)
            .ok_or_else(|| EvalError::overflow("multiplication")),
        (Decimal(a), Integer(b)) => a
            .checked_mul(rust_decimal::Decimal::from(*b))
            .map(Decimal)
            .ok_or_else(|| EvalError::overflow("multiplication")),
        (Quantity(a), Quantity(b)) => Ok(Quantity(a.mul(b)?)),
        (Quantity(a), Integer(_) | Decimal(_)) => match right.to_decimal() {
            Some(b) => Ok(Quantity(a.mul(&SystemQuantity::unitless(b))?)),
            None => Err(EvalError::unsupported_operator("*", operand_types(left, right))),
        },
        (Integer(_) | Decimal(_), Quantity(b)) => match left.to_decimal() {
            Some(a) => Ok(Quantity(SystemQuantity::unitless(a).mul(b)?)),
            None => Err(EvalError::unsupported_operator("*", operand_types(left, right))),
        },
        _ => Err(EvalError::unsupported_operator(
            "*",
            operand_types(left, right),
        )),
    }
}

/// True division: integer operands promote to decimal.
fn divide(left: &SystemValue, right: &SystemValue) -> EvalResult<SystemValue> {
    use SystemValue::*;
    match (left, right) {
        (Integer(_) | Decimal(_), Integer(_) | Decimal(_)) => {
            match (left.to_decimal(), right.to_decimal()) {
                (Some(a), Some(b)) => a
                    .checked_div(b)
                    .map(Decimal)
                    .ok_or_else(|| EvalError::overflow("division")),
                _ => Err(EvalError::unsupported_operator("/", operand_types(left, right))),
            }
        }
        (Quantity(a), Quantity(b)) => Ok(Quantity(a.div(b)?)),
        (Quantity(a), Integer(_) | Decimal(_)) => match right.to_decimal() {
            Some(b) => Ok(Quantity(a.div(&SystemQuantity::unitless(b))?)),
            None => Err(EvalError::unsupported_operator("/", operand_types(left, right))),
        },
        (Integer(_) | Decimal(_), Quantity(b)) => match left.to_decimal() {
            Some(a) => Ok(Quantity(SystemQuantity::unitless(a).div(b)?)),
            None => Err(EvalError::unsupported_operator("/", operand_types(left, right))),
        },
        _ => Err(EvalError::unsupported_operator(
            "/",
            operand_types(left, right),
        )),
    }
}

/// `div` truncates toward zero; mixed operands stay decimal at scale 0.
fn integer_divide(left: &SystemValue, right: &SystemValue) -> EvalResult<SystemValue> {
    use SystemValue::*;
    match (left, right) {
        (Integer(a), Integer(b)) => a
            .checked_div(*b)
            .map(Integer)
            .ok_or_else(|| EvalError::overflow("integer division")),
        (Integer(_) | Decimal(_), Integer(_) | Decimal(_)) => {
            match (left.to_decimal(), right.to_decimal()) {
                (Some(a), Some(b)) => a
                    .checked_div(b)
                    .map(|d| Decimal(d.trunc()))
                    .ok_or_else(|| EvalError::overflow("integer division")),
                _ => Err(EvalError::unsupported_operator("div", operand_types(left, right))),
            }
        }
        _ => Err(EvalError::unsupported_operator(
            "div",
            operand_types(left, right),
        )),
    }
}

/// `mod` follows the dividend's sign.
fn modulo(left: &SystemValue, right: &SystemValue) -> EvalResult<SystemValue> {
    use SystemValue::*;
    match (left, right) {
        (Integer(a), Integer(b)) => a
            .checked_rem(*b)
            .map(Integer)
            .ok_or_else(|| EvalError::overflow("modulo")),
        (Integer(_) | Decimal(_), Integer(_) | Decimal(_)) => {
            match (left.to_decimal(), right.to_decimal()) {
                (Some(a), Some(b)) => a
                    .checked_rem(b)
                    .map(Decimal)
                    .ok_or_else(|| EvalError::overflow("modulo")),
                _ => Err(EvalError::unsupported_operator("mod", operand_types(left, right))),
            }
        }
        _ => Err(EvalError::unsupported_operator(
            "mod",
            operand_types(left, right),
        )),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolarityOp {
    Plus,
    Minus,
}

impl PolarityOp {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "+" => Some(Self::Plus),
            "-" => Some(Self::Minus),
            _ => None,
        }
    }
}

/// Unary `+` or `-` on a numeric or quantity operand
#[derive(Debug)]
pub struct PolarityOperator {
    op: Option<PolarityOp>,
    operand: EvaluatorRef,
}

impl PolarityOperator {
    pub fn new(
        token: &str,
        operand: EvaluatorRef,
        location: SourceLocation,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let op = PolarityOp::parse(token);
        if op.is_none() {
            diagnostics.add_error_with_code(
                FP0015,
                location.line,
                location.column,
                format!("unsupported polarity operator '{token}'"),
            );
        }
        Self { op, operand }
    }
}

impl Evaluator for PolarityOperator {
    fn evaluate(
        &self,
        ctx: &mut EvalContext,
        focus: &Collection,
        this: Option<&SystemValue>,
    ) -> EvalResult<Option<SystemValue>> {
        let op = self
            .op
            .ok_or_else(|| EvalError::invalid_expression("polarity operator failed to parse"))?;
        let Some(value) = singleton(ctx.evaluate(&*self.operand, focus, this)?)? else {
            return Ok(None);
        };
        match op {
            PolarityOp::Plus => match value {
                SystemValue::Integer(_) | SystemValue::Decimal(_) | SystemValue::Quantity(_) => {
                    Ok(Some(value))
                }
                other => Err(EvalError::type_mismatch(
                    "a numeric or quantity value",
                    other.data_type().qualified_name(),
                )),
            },
            PolarityOp::Minus => match value {
                SystemValue::Integer(i) => i
                    .checked_neg()
                    .map(|n| Some(SystemValue::Integer(n)))
                    .ok_or_else(|| EvalError::overflow("negation")),
                SystemValue::Decimal(d) => Ok(Some(SystemValue::Decimal(-d))),
                SystemValue::Quantity(q) => Ok(Some(SystemValue::Quantity(q.negate()))),
                other => Err(EvalError::type_mismatch(
                    "a numeric or quantity value",
                    other.data_type().qualified_name(),
                )),
            },
        }
    }
}
