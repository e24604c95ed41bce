//! The system value union and its comparison contracts
//!
//! Every value the engine produces is one variant of [`SystemValue`].
//! The shared contracts are exhaustive matches over the variants:
//! `equal` is exact (cross-kind only between the lossless Integer and
//! Decimal pair and between numbers and quantities), `equivalent` relaxes
//! precision, case, and whitespace, and `compare` reports one of three
//! outcomes so callers can keep "no answer" distinct from "wrong kinds".

use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;

use crate::adapter::ModelNode;
use crate::collection::Collection;
use crate::decimal::{decimal_compare, decimal_equal, decimal_equivalent};
use crate::quantity::SystemQuantity;
use crate::temporal::{date_datetime_equivalent, SystemDate, SystemDateTime, SystemTime};
use crate::types::{SystemType, TypeSpec};

/// Outcome of an ordering attempt.
///
/// `Empty` means the kinds are comparable in principle but these operands
/// are not commensurable (precision mismatch, unconvertible units); the
/// caller surfaces it as an empty result. `Inconvertible` means the kinds
/// can never be ordered and is surfaced as an evaluation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Evaluated(Ordering),
    Empty,
    Inconvertible,
}

/// A single value in the system model.
#[derive(Debug, Clone, PartialEq)]
pub enum SystemValue {
    Boolean(bool),
    Integer(i32),
    Decimal(Decimal),
    String(String),
    Date(SystemDate),
    DateTime(SystemDateTime),
    Time(SystemTime),
    Quantity(SystemQuantity),
    Collection(Collection),
    Node(ModelNode),
}

impl SystemValue {
    pub fn boolean(value: bool) -> Self {
        SystemValue::Boolean(value)
    }

    pub fn integer(value: i32) -> Self {
        SystemValue::Integer(value)
    }

    pub fn decimal(value: Decimal) -> Self {
        SystemValue::Decimal(value)
    }

    pub fn string(value: impl Into<String>) -> Self {
        SystemValue::String(value.into())
    }

    /// Quantity from a magnitude and the unit token as written
    pub fn quantity(value: Decimal, unit: &str) -> Self {
        SystemValue::Quantity(SystemQuantity::new(value, unit))
    }

    /// Fixed discriminant for this value
    pub fn data_type(&self) -> SystemType {
        match self {
            SystemValue::Boolean(_) => SystemType::Boolean,
            SystemValue::Integer(_) => SystemType::Integer,
            SystemValue::Decimal(_) => SystemType::Decimal,
            SystemValue::String(_) => SystemType::String,
            SystemValue::Date(_) => SystemType::Date,
            SystemValue::DateTime(_) => SystemType::DateTime,
            SystemValue::Time(_) => SystemType::Time,
            SystemValue::Quantity(_) => SystemType::Quantity,
            SystemValue::Collection(_) => SystemType::Collection,
            SystemValue::Node(_) => SystemType::Node,
        }
    }

    /// Short type name without the `System.` namespace
    pub fn type_name(&self) -> &'static str {
        self.data_type().name()
    }

    /// Type spec for this value; nodes carry the spec their adapter
    /// stamped on them.
    pub fn type_spec(&self) -> TypeSpec {
        match self {
            SystemValue::Node(node) => node.type_spec().clone(),
            other => other.data_type().type_spec(),
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            SystemValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            SystemValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            SystemValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_quantity(&self) -> Option<&SystemQuantity> {
        match self {
            SystemValue::Quantity(q) => Some(q),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            SystemValue::Collection(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&ModelNode> {
        match self {
            SystemValue::Node(n) => Some(n),
            _ => None,
        }
    }

    /// Numeric content promoted to a decimal; integers convert
    /// losslessly.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            SystemValue::Integer(i) => Some(Decimal::from(*i)),
            SystemValue::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// A number viewed as a bare quantity, for mixed number/quantity
    /// operations.
    fn to_unitless_quantity(&self) -> Option<SystemQuantity> {
        self.to_decimal().map(SystemQuantity::unitless)
    }

    /// Exact equality.
    ///
    /// Integer and Decimal compare numerically (the conversion is
    /// lossless); quantities align units first; temporal values require
    /// the same concrete kind and precision. Everything else demands
    /// matching kinds.
    pub fn equal(&self, other: &SystemValue) -> bool {
        use SystemValue::*;
        match (self, other) {
            (Boolean(l), Boolean(r)) => l == r,
            (Integer(l), Integer(r)) => l == r,
            (Decimal(_) | Integer(_), Decimal(_) | Integer(_)) => {
                match (self.to_decimal(), other.to_decimal()) {
                    (Some(l), Some(r)) => decimal_equal(&l, &r),
                    _ => false,
                }
            }
            (String(l), String(r)) => l == r,
            (Date(l), Date(r)) => l.equal(r),
            (DateTime(l), DateTime(r)) => l.equal(r),
            (Time(l), Time(r)) => l.equal(r),
            (Quantity(l), Quantity(r)) => l.equal(r),
            (Quantity(q), Integer(_) | Decimal(_)) => match other.to_unitless_quantity() {
                Some(bare) => q.equal(&bare),
                None => false,
            },
            (Integer(_) | Decimal(_), Quantity(q)) => match self.to_unitless_quantity() {
                Some(bare) => bare.equal(q),
                None => false,
            },
            (Collection(l), Collection(r)) => l.equal(r),
            (Node(l), Node(r)) => l == r,
            _ => false,
        }
    }

    /// Relaxed equality: least-precision decimals, lower-precision
    /// temporals with the Date/DateTime midnight bridge, normalized
    /// strings, unit-aligned quantities.
    pub fn equivalent(&self, other: &SystemValue) -> bool {
        use SystemValue::*;
        match (self, other) {
            (Boolean(l), Boolean(r)) => l == r,
            (Integer(l), Integer(r)) => l == r,
            (Decimal(_) | Integer(_), Decimal(_) | Integer(_)) => {
                match (self.to_decimal(), other.to_decimal()) {
                    (Some(l), Some(r)) => decimal_equivalent(&l, &r),
                    _ => false,
                }
            }
            (String(l), String(r)) => normalized_string_equivalent(l, r),
            (Date(l), Date(r)) => l.equivalent(r),
            (DateTime(l), DateTime(r)) => l.equivalent(r),
            (Date(d), DateTime(dt)) | (DateTime(dt), Date(d)) => date_datetime_equivalent(d, dt),
            (Time(l), Time(r)) => l.equivalent(r),
            (Quantity(l), Quantity(r)) => l.equivalent(r),
            (Quantity(q), Integer(_) | Decimal(_)) => match other.to_unitless_quantity() {
                Some(bare) => q.equivalent(&bare),
                None => false,
            },
            (Integer(_) | Decimal(_), Quantity(q)) => match self.to_unitless_quantity() {
                Some(bare) => bare.equivalent(q),
                None => false,
            },
            (Collection(l), Collection(r)) => l.equivalent(r),
            (Node(l), Node(r)) => l == r,
            _ => false,
        }
    }

    /// Ordering across the orderable kinds.
    ///
    /// Numbers and quantities interoperate; a date may be ordered against
    /// a datetime by treating it as midnight at the date's precision.
    pub fn compare(&self, other: &SystemValue) -> Comparison {
        use SystemValue::*;
        match (self, other) {
            (Integer(_) | Decimal(_), Integer(_) | Decimal(_)) => {
                match (self.to_decimal(), other.to_decimal()) {
                    (Some(l), Some(r)) => Comparison::Evaluated(decimal_compare(&l, &r)),
                    _ => Comparison::Inconvertible,
                }
            }
            (Quantity(l), Quantity(r)) => ordering_or_empty(l.compare(r)),
            (Quantity(q), Integer(_) | Decimal(_)) => match other.to_unitless_quantity() {
                Some(bare) => ordering_or_empty(q.compare(&bare)),
                None => Comparison::Inconvertible,
            },
            (Integer(_) | Decimal(_), Quantity(q)) => match self.to_unitless_quantity() {
                Some(bare) => ordering_or_empty(bare.compare(q)),
                None => Comparison::Inconvertible,
            },
            (String(l), String(r)) => Comparison::Evaluated(l.cmp(r)),
            (Date(l), Date(r)) => ordering_or_empty(l.compare(r)),
            (DateTime(l), DateTime(r)) => ordering_or_empty(l.compare(r)),
            (Date(d), DateTime(r)) => {
                ordering_or_empty(SystemDateTime::from_date(*d).compare(r))
            }
            (DateTime(l), Date(d)) => {
                ordering_or_empty(l.compare(&SystemDateTime::from_date(*d)))
            }
            (Time(l), Time(r)) => ordering_or_empty(l.compare(r)),
            _ => Comparison::Inconvertible,
        }
    }
}

fn ordering_or_empty(ordering: Option<Ordering>) -> Comparison {
    match ordering {
        Some(ordering) => Comparison::Evaluated(ordering),
        None => Comparison::Empty,
    }
}

/// Whitespace-normalized, case-insensitive string equivalence: runs of
/// whitespace act as a single separator and edge whitespace is ignored.
pub fn normalized_string_equivalent(left: &str, right: &str) -> bool {
    let mut left_words = left.split_whitespace();
    let mut right_words = right.split_whitespace();
    loop {
        match (left_words.next(), right_words.next()) {
            (None, None) => return true,
            (Some(l), Some(r)) if l.to_lowercase() == r.to_lowercase() => {}
            _ => return false,
        }
    }
}

impl fmt::Display for SystemValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemValue::Boolean(b) => write!(f, "{b}"),
            SystemValue::Integer(i) => write!(f, "{i}"),
            SystemValue::Decimal(d) => write!(f, "{d}"),
            SystemValue::String(s) => write!(f, "{s}"),
            SystemValue::Date(d) => write!(f, "{d}"),
            SystemValue::DateTime(dt) => write!(f, "{dt}"),
            SystemValue::Time(t) => write!(f, "{t}"),
            SystemValue::Quantity(q) => write!(f, "{q}"),
            SystemValue::Collection(c) => write!(f, "{c}"),
            SystemValue::Node(n) => write!(f, "{}", n.data()),
        }
    }
}

impl From<bool> for SystemValue {
    fn from(value: bool) -> Self {
        SystemValue::Boolean(value)
    }
}

impl From<i32> for SystemValue {
    fn from(value: i32) -> Self {
        SystemValue::Integer(value)
    }
}

impl From<Decimal> for SystemValue {
    fn from(value: Decimal) -> Self {
        SystemValue::Decimal(value)
    }
}

impl From<&str> for SystemValue {
    fn from(value: &str) -> Self {
        SystemValue::String(value.to_string())
    }
}

impl From<String> for SystemValue {
    fn from(value: String) -> Self {
        SystemValue::String(value)
    }
}

impl From<SystemDate> for SystemValue {
    fn from(value: SystemDate) -> Self {
        SystemValue::Date(value)
    }
}

impl From<SystemDateTime> for SystemValue {
    fn from(value: SystemDateTime) -> Self {
        SystemValue::DateTime(value)
    }
}

impl From<SystemTime> for SystemValue {
    fn from(value: SystemTime) -> Self {
        SystemValue::Time(value)
    }
}

impl From<SystemQuantity> for SystemValue {
    fn from(value: SystemQuantity) -> Self {
        SystemValue::Quantity(value)
    }
}

impl From<Collection> for SystemValue {
    fn from(value: Collection) -> Self {
        SystemValue::Collection(value)
    }
}

impl From<ModelNode> for SystemValue {
    fn from(value: ModelNode) -> Self {
        SystemValue::Node(value)
    }
}
