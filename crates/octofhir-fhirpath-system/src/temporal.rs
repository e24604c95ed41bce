//! Temporal values with explicit precision
//!
//! Date, DateTime, and Time carry the precision they were written with.
//! Fields below the stated precision are stored at their minimum (month 1,
//! day 1, zero time) and are never treated as meaningful data. Equality
//! demands matching precision; ordering across differing precisions is not
//! an error but "no answer" (`None`); equivalence compares at the lower of
//! the two precisions.
//!
//! Calendar addition is field-correct: adding a month to January 31st
//! clamps to the end of February rather than sliding a fixed number of
//! days. Fractional amounts spill into the next finer unit before being
//! applied. The result is re-expressed at the receiver's original
//! precision, so sub-precision movement of the underlying instant is
//! discarded.

use chrono::{Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Granularity at which a temporal value is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TemporalPrecision {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Nanosecond,
}

/// Errors from calendar arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemporalError {
    /// The quantity unit cannot be applied to this temporal kind
    #[error("unit '{unit}' cannot be added to a {kind}")]
    InvalidUnit { unit: &'static str, kind: &'static str },

    /// The resulting year left the supported calendar range
    #[error("resulting year {year} is outside 1..=9999")]
    YearOutOfRange { year: i32 },

    /// Field arithmetic overflowed
    #[error("date/time arithmetic overflow")]
    Overflow,
}

/// Calendar-duration unit resolved from a quantity's unit token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalendarUnit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
    Microsecond,
    Nanosecond,
}

impl CalendarUnit {
    /// Resolve a unit token: the singular word, its plural, or the UCUM
    /// code for the same duration.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "year" | "years" | "a" => Some(Self::Year),
            "month" | "months" | "mo" => Some(Self::Month),
            "week" | "weeks" | "wk" => Some(Self::Week),
            "day" | "days" | "d" => Some(Self::Day),
            "hour" | "hours" | "h" => Some(Self::Hour),
            "minute" | "minutes" | "min" => Some(Self::Minute),
            "second" | "seconds" | "s" => Some(Self::Second),
            "millisecond" | "milliseconds" | "ms" => Some(Self::Millisecond),
            "microsecond" | "microseconds" | "us" => Some(Self::Microsecond),
            "nanosecond" | "nanoseconds" | "ns" => Some(Self::Nanosecond),
            _ => None,
        }
    }

    /// The singular calendar word for this unit
    pub const fn word(&self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Week => "week",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
            Self::Millisecond => "millisecond",
            Self::Microsecond => "microsecond",
            Self::Nanosecond => "nanosecond",
        }
    }

    /// The temporal precision this unit acts at. Weeks act at day
    /// precision; sub-second units all land in the nanosecond band.
    pub const fn precision(&self) -> TemporalPrecision {
        match self {
            Self::Year => TemporalPrecision::Year,
            Self::Month => TemporalPrecision::Month,
            Self::Week | Self::Day => TemporalPrecision::Day,
            Self::Hour => TemporalPrecision::Hour,
            Self::Minute => TemporalPrecision::Minute,
            Self::Second => TemporalPrecision::Second,
            Self::Millisecond | Self::Microsecond | Self::Nanosecond => {
                TemporalPrecision::Nanosecond
            }
        }
    }

    /// Next finer unit and how many of it make one of this unit.
    /// Month→day uses the fixed 30-day approximation.
    const fn finer(self) -> Option<(CalendarUnit, i64)> {
        match self {
            Self::Year => Some((Self::Month, 12)),
            Self::Month => Some((Self::Day, 30)),
            Self::Week => Some((Self::Day, 7)),
            Self::Day => Some((Self::Hour, 24)),
            Self::Hour => Some((Self::Minute, 60)),
            Self::Minute => Some((Self::Second, 60)),
            Self::Second => Some((Self::Millisecond, 1000)),
            Self::Millisecond => Some((Self::Microsecond, 1000)),
            Self::Microsecond => Some((Self::Nanosecond, 1000)),
            Self::Nanosecond => None,
        }
    }
}

const fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

const fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

fn validate_year(year: i32) -> Result<(), TemporalError> {
    if (1..=9999).contains(&year) {
        Ok(())
    } else {
        Err(TemporalError::YearOutOfRange { year })
    }
}

/// Break a possibly fractional amount into whole steps of progressively
/// finer units. `0.89 year` becomes 10 months, 20 days, 9 hours, 36
/// minutes; anything below a whole nanosecond is discarded.
fn spill(
    amount: &Decimal,
    unit: CalendarUnit,
) -> Result<SmallVec<[(i64, CalendarUnit); 10]>, TemporalError> {
    let mut parts = SmallVec::new();
    let mut remaining = *amount;
    let mut current = unit;
    loop {
        let whole = remaining.trunc();
        let count = whole.to_i64().ok_or(TemporalError::Overflow)?;
        if count != 0 {
            parts.push((count, current));
        }
        let fraction = remaining - whole;
        let Some((next, ratio)) = current.finer() else {
            break;
        };
        if fraction.is_zero() {
            break;
        }
        remaining = fraction
            .checked_mul(Decimal::from(ratio))
            .ok_or(TemporalError::Overflow)?;
        current = next;
    }
    Ok(parts)
}

/// Month arithmetic with end-of-month clamping.
fn add_months_to(dt: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let total = i64::from(dt.year()) * 12 + i64::from(dt.month0()) + months;
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = u32::try_from(total.rem_euclid(12)).ok()? + 1;
    let day = dt.day().min(days_in_month(year, month));
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(NaiveDateTime::new(date, dt.time()))
}

fn apply_step(dt: NaiveDateTime, count: i64, unit: CalendarUnit) -> Option<NaiveDateTime> {
    match unit {
        CalendarUnit::Year => add_months_to(dt, count.checked_mul(12)?),
        CalendarUnit::Month => add_months_to(dt, count),
        CalendarUnit::Week => dt.checked_add_signed(Duration::try_days(count.checked_mul(7)?)?),
        CalendarUnit::Day => dt.checked_add_signed(Duration::try_days(count)?),
        CalendarUnit::Hour => dt.checked_add_signed(Duration::try_hours(count)?),
        CalendarUnit::Minute => dt.checked_add_signed(Duration::try_minutes(count)?),
        CalendarUnit::Second => dt.checked_add_signed(Duration::try_seconds(count)?),
        CalendarUnit::Millisecond => {
            dt.checked_add_signed(Duration::nanoseconds(count.checked_mul(1_000_000)?))
        }
        CalendarUnit::Microsecond => {
            dt.checked_add_signed(Duration::nanoseconds(count.checked_mul(1_000)?))
        }
        CalendarUnit::Nanosecond => dt.checked_add_signed(Duration::nanoseconds(count)),
    }
}

fn apply_spilled(
    start: NaiveDateTime,
    amount: &Decimal,
    unit: CalendarUnit,
) -> Result<NaiveDateTime, TemporalError> {
    let mut dt = start;
    for (count, step_unit) in spill(amount, unit)? {
        dt = apply_step(dt, count, step_unit).ok_or(TemporalError::Overflow)?;
    }
    validate_year(dt.year())?;
    Ok(dt)
}

fn truncate_date(date: NaiveDate, precision: TemporalPrecision) -> NaiveDate {
    match precision {
        TemporalPrecision::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        TemporalPrecision::Month => {
            NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
        }
        _ => date,
    }
}

fn truncate_time(time: NaiveTime, precision: TemporalPrecision) -> NaiveTime {
    let (h, m, s, ns) = (time.hour(), time.minute(), time.second(), time.nanosecond());
    let built = match precision {
        TemporalPrecision::Year | TemporalPrecision::Month | TemporalPrecision::Day => {
            NaiveTime::from_hms_opt(0, 0, 0)
        }
        TemporalPrecision::Hour => NaiveTime::from_hms_opt(h, 0, 0),
        TemporalPrecision::Minute => NaiveTime::from_hms_opt(h, m, 0),
        TemporalPrecision::Second => NaiveTime::from_hms_opt(h, m, s),
        TemporalPrecision::Nanosecond => NaiveTime::from_hms_nano_opt(h, m, s, ns),
    };
    built.unwrap_or(time)
}

fn truncate_datetime(dt: NaiveDateTime, precision: TemporalPrecision) -> NaiveDateTime {
    NaiveDateTime::new(
        truncate_date(dt.date(), precision),
        truncate_time(dt.time(), precision),
    )
}

/// Sub-second digits with trailing zeros removed, at least one digit.
fn format_fraction(nanos: u32) -> String {
    let mut text = format!("{nanos:09}");
    while text.len() > 1 && text.ends_with('0') {
        text.pop();
    }
    text
}

/// Parse 1-9 fractional digits into nanoseconds.
fn parse_fraction(text: &str) -> Option<u32> {
    if text.is_empty() || text.len() > 9 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: u32 = text.parse().ok()?;
    Some(value * 10u32.pow(9 - text.len() as u32))
}

fn parse_field(text: &str, width: usize) -> Option<u32> {
    if text.len() != width || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Parse `HH[:MM[:SS[.fff]]]`, reporting the precision that was written.
fn parse_time_fields(text: &str) -> Option<(NaiveTime, TemporalPrecision)> {
    let mut precision = TemporalPrecision::Hour;
    let (clock, fraction) = match text.split_once('.') {
        Some((clock, fraction)) => (clock, Some(fraction)),
        None => (text, None),
    };

    let mut parts = clock.split(':');
    let hour = parse_field(parts.next()?, 2)?;
    let mut minute = 0;
    let mut second = 0;
    if let Some(m) = parts.next() {
        minute = parse_field(m, 2)?;
        precision = TemporalPrecision::Minute;
        if let Some(s) = parts.next() {
            second = parse_field(s, 2)?;
            precision = TemporalPrecision::Second;
        } else if fraction.is_some() {
            return None;
        }
    } else if fraction.is_some() {
        return None;
    }
    if parts.next().is_some() {
        return None;
    }

    let nanos = match fraction {
        Some(f) => {
            precision = TemporalPrecision::Nanosecond;
            parse_fraction(f)?
        }
        None => 0,
    };

    NaiveTime::from_hms_nano_opt(hour, minute, second, nanos).map(|t| (t, precision))
}

fn parse_date_fields(text: &str) -> Option<(NaiveDate, TemporalPrecision)> {
    let mut parts = text.split('-');
    let year_text = parts.next()?;
    if year_text.len() != 4 || !year_text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = year_text.parse().ok()?;
    validate_year(year).ok()?;

    let mut month = 1;
    let mut day = 1;
    let mut precision = TemporalPrecision::Year;
    if let Some(m) = parts.next() {
        month = parse_field(m, 2)?;
        precision = TemporalPrecision::Month;
        if let Some(d) = parts.next() {
            day = parse_field(d, 2)?;
            precision = TemporalPrecision::Day;
        }
    }
    if parts.next().is_some() {
        return None;
    }

    NaiveDate::from_ymd_opt(year, month, day).map(|d| (d, precision))
}

fn parse_offset(text: &str) -> Option<FixedOffset> {
    if text == "Z" {
        return FixedOffset::east_opt(0);
    }
    let (sign, rest) = match text.as_bytes().first()? {
        b'+' => (1, &text[1..]),
        b'-' => (-1, &text[1..]),
        _ => return None,
    };
    let (h, m) = rest.split_once(':')?;
    let hours = parse_field(h, 2)?;
    let minutes = parse_field(m, 2)?;
    if hours > 14 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours as i32 * 3600 + minutes as i32 * 60))
}

fn format_offset(offset: FixedOffset) -> String {
    let seconds = offset.local_minus_utc();
    if seconds == 0 {
        return "Z".to_string();
    }
    let sign = if seconds < 0 { '-' } else { '+' };
    let abs = seconds.abs();
    format!("{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60)
}

/// A calendar date known to year, month, or day precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemDate {
    date: NaiveDate,
    precision: TemporalPrecision,
}

impl SystemDate {
    /// Date at year precision
    pub fn from_year(year: i32) -> Option<Self> {
        validate_year(year).ok()?;
        NaiveDate::from_ymd_opt(year, 1, 1).map(|date| Self {
            date,
            precision: TemporalPrecision::Year,
        })
    }

    /// Date at month precision
    pub fn from_year_month(year: i32, month: u32) -> Option<Self> {
        validate_year(year).ok()?;
        NaiveDate::from_ymd_opt(year, month, 1).map(|date| Self {
            date,
            precision: TemporalPrecision::Month,
        })
    }

    /// Date at day precision
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        validate_year(year).ok()?;
        NaiveDate::from_ymd_opt(year, month, day).map(|date| Self {
            date,
            precision: TemporalPrecision::Day,
        })
    }

    /// Parse `YYYY[-MM[-DD]]`
    pub fn parse(text: &str) -> Option<Self> {
        let (date, precision) = parse_date_fields(text)?;
        Some(Self { date, precision })
    }

    pub fn precision(&self) -> TemporalPrecision {
        self.precision
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Month, when known at this precision
    pub fn month(&self) -> Option<u32> {
        (self.precision >= TemporalPrecision::Month).then(|| self.date.month())
    }

    /// Day of month, when known at this precision
    pub fn day(&self) -> Option<u32> {
        (self.precision >= TemporalPrecision::Day).then(|| self.date.day())
    }

    pub(crate) fn inner(&self) -> NaiveDate {
        self.date
    }

    /// Exact equality: same precision and same fields.
    pub fn equal(&self, other: &Self) -> bool {
        self.precision == other.precision && self.date == other.date
    }

    /// Equivalence at the lower of the two precisions.
    pub fn equivalent(&self, other: &Self) -> bool {
        let precision = self.precision.min(other.precision);
        truncate_date(self.date, precision) == truncate_date(other.date, precision)
    }

    /// Ordering, or `None` when precisions differ.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        (self.precision == other.precision).then(|| self.date.cmp(&other.date))
    }

    /// Calendar-correct addition of a possibly fractional amount.
    ///
    /// Units finer than a day are rejected. The computed instant is
    /// truncated back to this date's precision.
    pub fn add_quantity(&self, amount: &Decimal, unit: CalendarUnit) -> Result<Self, TemporalError> {
        if unit.precision() > TemporalPrecision::Day {
            return Err(TemporalError::InvalidUnit {
                unit: unit.word(),
                kind: "Date",
            });
        }
        let start = NaiveDateTime::new(self.date, NaiveTime::MIN);
        let result = apply_spilled(start, amount, unit)?;
        Ok(Self {
            date: truncate_date(result.date(), self.precision),
            precision: self.precision,
        })
    }
}

impl fmt::Display for SystemDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.precision {
            TemporalPrecision::Year => write!(f, "{:04}", self.date.year()),
            TemporalPrecision::Month => {
                write!(f, "{:04}-{:02}", self.date.year(), self.date.month())
            }
            _ => write!(
                f,
                "{:04}-{:02}-{:02}",
                self.date.year(),
                self.date.month(),
                self.date.day()
            ),
        }
    }
}

/// A date and time of day, known down to some precision, with an optional
/// UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemDateTime {
    datetime: NaiveDateTime,
    offset: Option<FixedOffset>,
    precision: TemporalPrecision,
}

impl SystemDateTime {
    /// Build from parts; fields below `precision` must already be minimal.
    pub fn new(
        datetime: NaiveDateTime,
        offset: Option<FixedOffset>,
        precision: TemporalPrecision,
    ) -> Self {
        Self {
            datetime: truncate_datetime(datetime, precision),
            offset,
            precision,
        }
    }

    /// Midnight at the given date's precision, without an offset.
    pub fn from_date(date: SystemDate) -> Self {
        Self {
            datetime: NaiveDateTime::new(date.inner(), NaiveTime::MIN),
            offset: None,
            precision: date.precision(),
        }
    }

    /// Parse `YYYY[-MM[-DD]]T[HH[:MM[:SS[.fff]]]][zone]`
    pub fn parse(text: &str) -> Option<Self> {
        let (date_text, rest) = text.split_once('T')?;
        let (date, date_precision) = parse_date_fields(date_text)?;

        // A zone may follow the bare `T` or the time fields
        let (time_text, offset) = match rest.find(['Z', '+', '-']) {
            Some(pos) => (&rest[..pos], Some(parse_offset(&rest[pos..])?)),
            None => (rest, None),
        };

        if time_text.is_empty() {
            return Some(Self {
                datetime: NaiveDateTime::new(date, NaiveTime::MIN),
                offset,
                precision: date_precision,
            });
        }

        // Time fields require a complete date
        if date_precision != TemporalPrecision::Day {
            return None;
        }
        let (time, precision) = parse_time_fields(time_text)?;
        Some(Self {
            datetime: NaiveDateTime::new(date, time),
            offset,
            precision,
        })
    }

    pub fn precision(&self) -> TemporalPrecision {
        self.precision
    }

    pub fn year(&self) -> i32 {
        self.datetime.year()
    }

    pub fn month(&self) -> Option<u32> {
        (self.precision >= TemporalPrecision::Month).then(|| self.datetime.month())
    }

    pub fn day(&self) -> Option<u32> {
        (self.precision >= TemporalPrecision::Day).then(|| self.datetime.day())
    }

    pub fn hour(&self) -> Option<u32> {
        (self.precision >= TemporalPrecision::Hour).then(|| self.datetime.hour())
    }

    pub fn minute(&self) -> Option<u32> {
        (self.precision >= TemporalPrecision::Minute).then(|| self.datetime.minute())
    }

    pub fn second(&self) -> Option<u32> {
        (self.precision >= TemporalPrecision::Second).then(|| self.datetime.second())
    }

    pub fn nanosecond(&self) -> Option<u32> {
        (self.precision >= TemporalPrecision::Nanosecond).then(|| self.datetime.nanosecond())
    }

    /// The UTC offset, when one was written
    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    /// Local fields shifted to UTC; an absent offset reads as zero.
    fn normalized(&self) -> NaiveDateTime {
        match self.offset {
            Some(offset) => self.datetime - Duration::seconds(i64::from(offset.local_minus_utc())),
            None => self.datetime,
        }
    }

    /// Whether the time-of-day is exactly midnight at local zero offset,
    /// the gate for equivalence with a plain date.
    pub fn is_midnight_utc(&self) -> bool {
        self.datetime.time() == NaiveTime::MIN
            && self.offset.is_none_or(|o| o.local_minus_utc() == 0)
    }

    pub(crate) fn date_part(&self) -> NaiveDate {
        self.datetime.date()
    }

    /// Exact equality: same precision and same instant.
    pub fn equal(&self, other: &Self) -> bool {
        self.precision == other.precision && self.normalized() == other.normalized()
    }

    /// Equivalence at the lower of the two precisions, on normalized
    /// instants.
    pub fn equivalent(&self, other: &Self) -> bool {
        let precision = self.precision.min(other.precision);
        truncate_datetime(self.normalized(), precision)
            == truncate_datetime(other.normalized(), precision)
    }

    /// Ordering of normalized instants, or `None` when precisions differ.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        (self.precision == other.precision).then(|| self.normalized().cmp(&other.normalized()))
    }

    /// Calendar-correct addition; any calendar unit is applicable. The
    /// result keeps this value's precision and offset.
    pub fn add_quantity(&self, amount: &Decimal, unit: CalendarUnit) -> Result<Self, TemporalError> {
        let result = apply_spilled(self.datetime, amount, unit)?;
        Ok(Self {
            datetime: truncate_datetime(result, self.precision),
            offset: self.offset,
            precision: self.precision,
        })
    }
}

impl fmt::Display for SystemDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = self.datetime.date();
        match self.precision {
            TemporalPrecision::Year => write!(f, "{:04}T", date.year())?,
            TemporalPrecision::Month => write!(f, "{:04}-{:02}T", date.year(), date.month())?,
            _ => write!(
                f,
                "{:04}-{:02}-{:02}T",
                date.year(),
                date.month(),
                date.day()
            )?,
        }
        let time = self.datetime.time();
        match self.precision {
            TemporalPrecision::Hour => write!(f, "{:02}", time.hour())?,
            TemporalPrecision::Minute => write!(f, "{:02}:{:02}", time.hour(), time.minute())?,
            TemporalPrecision::Second => write!(
                f,
                "{:02}:{:02}:{:02}",
                time.hour(),
                time.minute(),
                time.second()
            )?,
            TemporalPrecision::Nanosecond => write!(
                f,
                "{:02}:{:02}:{:02}.{}",
                time.hour(),
                time.minute(),
                time.second(),
                format_fraction(time.nanosecond())
            )?,
            _ => {}
        }
        if let Some(offset) = self.offset {
            write!(f, "{}", format_offset(offset))?;
        }
        Ok(())
    }
}

/// A time of day known to hour, minute, second, or nanosecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemTime {
    time: NaiveTime,
    precision: TemporalPrecision,
}

impl SystemTime {
    /// Build from parts; fields below `precision` must already be minimal.
    pub fn new(time: NaiveTime, precision: TemporalPrecision) -> Self {
        Self {
            time: truncate_time(time, precision.max(TemporalPrecision::Hour)),
            precision: precision.max(TemporalPrecision::Hour),
        }
    }

    /// Parse `HH[:MM[:SS[.fff]]]`
    pub fn parse(text: &str) -> Option<Self> {
        let (time, precision) = parse_time_fields(text)?;
        Some(Self { time, precision })
    }

    pub fn precision(&self) -> TemporalPrecision {
        self.precision
    }

    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    pub fn minute(&self) -> Option<u32> {
        (self.precision >= TemporalPrecision::Minute).then(|| self.time.minute())
    }

    pub fn second(&self) -> Option<u32> {
        (self.precision >= TemporalPrecision::Second).then(|| self.time.second())
    }

    pub fn nanosecond(&self) -> Option<u32> {
        (self.precision >= TemporalPrecision::Nanosecond).then(|| self.time.nanosecond())
    }

    /// Exact equality: same precision and same fields.
    pub fn equal(&self, other: &Self) -> bool {
        self.precision == other.precision && self.time == other.time
    }

    /// Equivalence at the lower of the two precisions.
    pub fn equivalent(&self, other: &Self) -> bool {
        let precision = self.precision.min(other.precision);
        truncate_time(self.time, precision) == truncate_time(other.time, precision)
    }

    /// Ordering, or `None` when precisions differ.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        (self.precision == other.precision).then(|| self.time.cmp(&other.time))
    }

    /// Addition of sub-day amounts, wrapping around midnight.
    pub fn add_quantity(&self, amount: &Decimal, unit: CalendarUnit) -> Result<Self, TemporalError> {
        if unit.precision() < TemporalPrecision::Hour {
            return Err(TemporalError::InvalidUnit {
                unit: unit.word(),
                kind: "Time",
            });
        }
        // Anchor on an arbitrary date; only the time-of-day survives.
        let anchor = NaiveDate::from_ymd_opt(2000, 1, 1).ok_or(TemporalError::Overflow)?;
        let result = apply_spilled(NaiveDateTime::new(anchor, self.time), amount, unit)?;
        Ok(Self {
            time: truncate_time(result.time(), self.precision),
            precision: self.precision,
        })
    }
}

impl fmt::Display for SystemTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.precision {
            TemporalPrecision::Minute => write!(f, "{:02}:{:02}", self.time.hour(), self.time.minute()),
            TemporalPrecision::Second => write!(
                f,
                "{:02}:{:02}:{:02}",
                self.time.hour(),
                self.time.minute(),
                self.time.second()
            ),
            TemporalPrecision::Nanosecond => write!(
                f,
                "{:02}:{:02}:{:02}.{}",
                self.time.hour(),
                self.time.minute(),
                self.time.second(),
                format_fraction(self.time.nanosecond())
            ),
            _ => write!(f, "{:02}", self.time.hour()),
        }
    }
}

/// Date ↔ DateTime equivalence: the DateTime must sit at midnight with a
/// zero or absent offset; date fields compare at the lower precision.
pub fn date_datetime_equivalent(date: &SystemDate, datetime: &SystemDateTime) -> bool {
    if !datetime.is_midnight_utc() {
        return false;
    }
    let precision = date
        .precision()
        .min(datetime.precision())
        .min(TemporalPrecision::Day);
    truncate_date(date.inner(), precision) == truncate_date(datetime.date_part(), precision)
}
