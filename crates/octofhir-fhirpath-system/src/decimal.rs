//! Decimal precision semantics
//!
//! Decimals keep the scale they were written or computed with: `64.10`
//! stays at two fractional digits and renders that way. The *effective*
//! precision used for equivalence excludes trailing zeros, found by
//! inspecting mantissa digits rather than the rendered string.
//!
//! Equality and equivalence are deliberately asymmetric: `Equal` compares
//! the exact numeric values and never truncates, while `Equivalent` first
//! truncates both operands to the smaller effective precision. `64.1 ~
//! 64.12` holds, `64.1 = 64.12` does not.

use rust_decimal::Decimal;
use std::cmp::Ordering;

/// Number of significant fractional digits, excluding trailing zeros.
///
/// `64.10` has effective precision 1; `10.00` and `10` both have 0.
pub fn fractional_precision(value: &Decimal) -> u32 {
    let mut scale = value.scale();
    let mut mantissa = value.mantissa();
    while scale > 0 && mantissa % 10 == 0 {
        mantissa /= 10;
        scale -= 1;
    }
    scale
}

/// Truncate (not round) to the given number of fractional digits.
pub fn truncate_to(value: &Decimal, digits: u32) -> Decimal {
    value.trunc_with_scale(digits)
}

/// Whether the value has no fractional part
pub fn is_integral(value: &Decimal) -> bool {
    fractional_precision(value) == 0
}

/// Exact numeric equality, no truncation.
pub fn decimal_equal(left: &Decimal, right: &Decimal) -> bool {
    left == right
}

/// Least-precision equivalence: both operands truncated to the smaller
/// effective precision, then compared exactly.
pub fn decimal_equivalent(left: &Decimal, right: &Decimal) -> bool {
    let precision = fractional_precision(left).min(fractional_precision(right));
    truncate_to(left, precision) == truncate_to(right, precision)
}

/// Total numeric ordering
pub fn decimal_compare(left: &Decimal, right: &Decimal) -> Ordering {
    left.cmp(right)
}

/// Parse a plain decimal literal. Scientific notation is not a valid
/// number literal and is rejected by the underlying parser.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    text.parse::<Decimal>().ok()
}
