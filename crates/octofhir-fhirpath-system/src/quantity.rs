//! Quantity values: a decimal magnitude with an optional unit
//!
//! The unit is stored as the token it was written with (calendar words
//! normalized to their singular), plus an exponent in 1..=3 split off a
//! UCUM code's trailing digit. Catalog entries are referenced at use
//! time, never copied into the value.

use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

use crate::decimal::{decimal_equivalent, parse_decimal};
use crate::ucum::{QuantityUnit, UnitCatalog};

/// Errors from quantity arithmetic and unit merging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    /// The two units cannot be brought onto a common unit
    #[error("units '{left}' and '{right}' are not compatible")]
    IncompatibleUnits { left: String, right: String },

    /// Multiplication or division pushed the exponent outside 1..=3
    #[error("resulting unit exponent {exp} is outside 1..=3")]
    ExponentOutOfRange { exp: i8 },

    /// Value arithmetic overflowed
    #[error("quantity arithmetic overflow")]
    Overflow,
}

/// A measured value, optionally carrying a unit and exponent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SystemQuantity {
    value: Decimal,
    unit: Option<String>,
    exp: u8,
}

/// Split a trailing exponent digit off a known UCUM code and normalize
/// calendar words to their singular. Unknown tokens pass through opaque.
fn normalize_token(token: &str) -> (String, u8) {
    let catalog = UnitCatalog::global();
    if let Some(entry) = catalog.resolve(token) {
        if entry.singular == Some(token) || entry.plural == Some(token) {
            return (entry.singular.unwrap_or(entry.code).to_string(), 1);
        }
        return (token.to_string(), 1);
    }
    if token.len() > 1 {
        if let Some(exp) = token.chars().last().and_then(|c| c.to_digit(10)) {
            if (1..=3).contains(&exp) {
                let prefix = &token[..token.len() - 1];
                if catalog.resolve(prefix).is_some_and(|e| e.code == prefix) {
                    return (prefix.to_string(), exp as u8);
                }
            }
        }
    }
    (token.to_string(), 1)
}

/// The token a merged result is written with: the calendar word when the
/// entry has one, else the UCUM code.
fn token_for(entry: &QuantityUnit) -> String {
    entry.singular.unwrap_or(entry.code).to_string()
}

impl SystemQuantity {
    /// Quantity with a unit token as written in an expression.
    pub fn new(value: Decimal, unit: &str) -> Self {
        let (token, exp) = normalize_token(unit);
        Self {
            value,
            unit: Some(token),
            exp,
        }
    }

    /// Quantity without a unit
    pub fn unitless(value: Decimal) -> Self {
        Self {
            value,
            unit: None,
            exp: 1,
        }
    }

    fn from_parts(value: Decimal, unit: Option<String>, exp: u8) -> Self {
        match unit {
            Some(unit) => Self {
                value,
                unit: Some(unit),
                exp,
            },
            None => Self::unitless(value),
        }
    }

    /// Parse `<number> <calendar-word>|'<ucum-code>'`.
    ///
    /// Bare unit tokens must be calendar duration words; anything else
    /// needs quotes.
    pub fn parse(text: &str) -> Option<Self> {
        let (number, unit) = text.trim().split_once(char::is_whitespace)?;
        let value = parse_decimal(number)?;
        let unit = unit.trim();
        if let Some(stripped) = unit.strip_prefix('\'') {
            let code = stripped.strip_suffix('\'')?;
            if code.is_empty() || code.contains('\'') {
                return None;
            }
            return Some(Self::new(value, code));
        }
        let entry = UnitCatalog::global().resolve(unit)?;
        if entry.singular == Some(unit) || entry.plural == Some(unit) {
            return Some(Self::new(value, unit));
        }
        None
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn exp(&self) -> u8 {
        self.exp
    }

    pub fn is_unitless(&self) -> bool {
        self.unit.is_none()
    }

    /// The same quantity with its value negated
    pub fn negate(&self) -> Self {
        Self {
            value: -self.value,
            unit: self.unit.clone(),
            exp: self.exp,
        }
    }

    fn resolved(&self) -> Option<&'static QuantityUnit> {
        UnitCatalog::global().resolve(self.unit.as_deref()?)
    }

    /// Exponent as used by merge algebra; a bare number contributes zero.
    fn effective_exp(&self) -> i8 {
        if self.unit.is_some() {
            self.exp as i8
        } else {
            0
        }
    }

    fn unit_or_one(&self) -> String {
        self.unit.clone().unwrap_or_else(|| "1".to_string())
    }

    /// The unit rendered for display: plural-aware calendar word, or the
    /// quoted UCUM code with its exponent digit.
    pub fn unit_name(&self) -> Option<String> {
        let token = self.unit.as_deref()?;
        if let Some(entry) = UnitCatalog::global().resolve(token) {
            if entry.singular == Some(token) {
                let word = if self.value.abs() == Decimal::ONE {
                    entry.singular.unwrap_or(entry.code)
                } else {
                    entry.plural.unwrap_or(entry.code)
                };
                return Some(word.to_string());
            }
        }
        if self.exp > 1 {
            Some(format!("'{}{}'", token, self.exp))
        } else {
            Some(format!("'{token}'"))
        }
    }

    /// Exact equality after bringing both sides onto a common unit.
    pub fn equal(&self, other: &Self) -> bool {
        match self.aligned_with(other) {
            Some((left, right)) => left == right,
            None => false,
        }
    }

    /// Equivalence after unit alignment, at the lower decimal precision.
    pub fn equivalent(&self, other: &Self) -> bool {
        match self.aligned_with(other) {
            Some((left, right)) => decimal_equivalent(&left, &right),
            None => false,
        }
    }

    /// Ordering after unit alignment, or `None` when the operands are not
    /// commensurable.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        let (left, right) = self.aligned_with(other)?;
        Some(left.cmp(&right))
    }

    /// Both values expressed in a common unit, when one exists.
    fn aligned_with(&self, other: &Self) -> Option<(Decimal, Decimal)> {
        if self.unit == other.unit {
            if self.unit.is_none() || self.exp == other.exp {
                return Some((self.value, other.value));
            }
            return None;
        }
        let (u1, u2) = (self.resolved()?, other.resolved()?);
        let (left, right, _) = UnitCatalog::global().convert_to_base(
            self.value, u1, self.exp, other.value, u2, other.exp, true,
        )?;
        Some((left, right))
    }

    /// Values and result unit for addition and subtraction: textually
    /// equal units pass through, a bare number inherits the other side's
    /// unit, and differing units are promoted to the more granular one.
    fn linear_operands(
        &self,
        other: &Self,
    ) -> Result<(Decimal, Decimal, Option<String>, u8), QuantityError> {
        if self.unit == other.unit {
            if self.unit.is_some() && self.exp != other.exp {
                return Err(QuantityError::IncompatibleUnits {
                    left: self.unit_or_one(),
                    right: other.unit_or_one(),
                });
            }
            return Ok((self.value, other.value, self.unit.clone(), self.exp));
        }
        match (&self.unit, &other.unit) {
            (Some(unit), None) => Ok((self.value, other.value, Some(unit.clone()), self.exp)),
            (None, Some(unit)) => Ok((self.value, other.value, Some(unit.clone()), other.exp)),
            _ => {
                let incompatible = || QuantityError::IncompatibleUnits {
                    left: self.unit_or_one(),
                    right: other.unit_or_one(),
                };
                if self.exp != other.exp {
                    return Err(incompatible());
                }
                let (u1, u2) = (
                    self.resolved().ok_or_else(incompatible)?,
                    other.resolved().ok_or_else(incompatible)?,
                );
                let (left, right, unit) = UnitCatalog::global()
                    .convert_to_most_granular(
                        self.value, u1, self.exp, other.value, u2, other.exp,
                    )
                    .ok_or_else(incompatible)?;
                Ok((left, right, Some(token_for(unit)), self.exp))
            }
        }
    }

    pub fn add(&self, other: &Self) -> Result<Self, QuantityError> {
        let (left, right, unit, exp) = self.linear_operands(other)?;
        let value = left.checked_add(right).ok_or(QuantityError::Overflow)?;
        Ok(Self::from_parts(value, unit, exp))
    }

    pub fn sub(&self, other: &Self) -> Result<Self, QuantityError> {
        let (left, right, unit, exp) = self.linear_operands(other)?;
        let value = left.checked_sub(right).ok_or(QuantityError::Overflow)?;
        Ok(Self::from_parts(value, unit, exp))
    }

    /// Values and result unit for multiplication and division, before
    /// exponent arithmetic. Bare numbers pass through; differing units
    /// are promoted to the more granular one.
    fn scaled_operands(
        &self,
        other: &Self,
    ) -> Result<(Decimal, Decimal, Option<String>), QuantityError> {
        match (&self.unit, &other.unit) {
            (None, None) => Ok((self.value, other.value, None)),
            (Some(unit), None) => Ok((self.value, other.value, Some(unit.clone()))),
            (None, Some(unit)) => Ok((self.value, other.value, Some(unit.clone()))),
            (Some(left), Some(right)) => {
                if left == right {
                    return Ok((self.value, other.value, Some(left.clone())));
                }
                let incompatible = || QuantityError::IncompatibleUnits {
                    left: left.clone(),
                    right: right.clone(),
                };
                let (u1, u2) = (
                    self.resolved().ok_or_else(incompatible)?,
                    other.resolved().ok_or_else(incompatible)?,
                );
                let (lv, rv, unit) = UnitCatalog::global()
                    .convert_to_most_granular(
                        self.value, u1, self.exp, other.value, u2, other.exp,
                    )
                    .ok_or_else(incompatible)?;
                Ok((lv, rv, Some(token_for(unit))))
            }
        }
    }

    fn with_merged_exp(
        value: Decimal,
        unit: Option<String>,
        exp: i8,
    ) -> Result<Self, QuantityError> {
        match exp {
            0 => Ok(Self::unitless(value)),
            1..=3 => Ok(Self::from_parts(value, unit, exp as u8)),
            _ => Err(QuantityError::ExponentOutOfRange { exp }),
        }
    }

    /// Multiplication sums exponents; the result must stay within 1..=3
    /// (zero collapses to a bare number).
    pub fn mul(&self, other: &Self) -> Result<Self, QuantityError> {
        let (left, right, unit) = self.scaled_operands(other)?;
        let value = left.checked_mul(right).ok_or(QuantityError::Overflow)?;
        Self::with_merged_exp(value, unit, self.effective_exp() + other.effective_exp())
    }

    /// Division subtracts exponents. The caller screens zero divisors.
    pub fn div(&self, other: &Self) -> Result<Self, QuantityError> {
        let (left, right, unit) = self.scaled_operands(other)?;
        let value = left.checked_div(right).ok_or(QuantityError::Overflow)?;
        Self::with_merged_exp(value, unit, self.effective_exp() - other.effective_exp())
    }

    /// Re-express this quantity in another unit of the same family. The
    /// target token may carry an exponent digit, which must match this
    /// quantity's exponent.
    pub fn to_unit(&self, target: &str) -> Option<Self> {
        let (token, target_exp) = normalize_token(target);
        if target_exp != self.exp {
            return None;
        }
        let catalog = UnitCatalog::global();
        let from = self.resolved()?;
        let to = catalog.resolve(&token)?;
        if catalog.root_of(from).code != catalog.root_of(to).code {
            return None;
        }
        let from_factor = catalog.factor_to_root(from)?;
        let to_factor = catalog.factor_to_root(to)?;
        let mut value = self.value;
        for _ in 0..self.exp {
            value = value.checked_mul(from_factor)?.checked_div(to_factor)?;
        }
        Some(Self {
            value,
            unit: Some(token),
            exp: self.exp,
        })
    }
}

impl fmt::Display for SystemQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit_name() {
            Some(name) => write!(f, "{} {}", self.value, name),
            None => write!(f, "{}", self.value),
        }
    }
}
