//! Calendar helpers
//!
//! The ledgers work with plain calendar dates (no time of day). This module
//! provides:
//! - Strict ISO `YYYY-MM-DD` parsing and a lenient normalizer for stored dates
//! - `MonthKey`, the `"{year}-{month:02}"` key used for billing cycles
//! - Billing-day arithmetic (month lengths, clamping)
//! - A timezone wrapper to compute the local "today"

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Timezone wrapper used to decide which calendar day "today" is
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Tz::from_str(&s)
            .map(Timezone)
            .map_err(|_| serde::de::Error::custom(format!("Invalid timezone: {}", s)))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Parses an IANA timezone name such as `Asia/Kolkata`
    pub fn parse(name: &str) -> Result<Self, TemporalError> {
        Tz::from_str(name)
            .map(Timezone)
            .map_err(|_| TemporalError::InvalidTimezone(name.to_string()))
    }

    /// Returns the calendar date of a UTC instant in this timezone
    pub fn date_of(&self, utc: DateTime<Utc>) -> NaiveDate {
        utc.with_timezone(&self.0).date_naive()
    }

    /// Returns today's calendar date in this timezone
    pub fn today(&self) -> NaiveDate {
        self.date_of(Utc::now())
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::Asia::Kolkata)
    }
}

/// Errors related to calendar values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Date must use the YYYY-MM-DD format: {0}")]
    InvalidFormat(String),

    #[error("Not a calendar date: {0}")]
    InvalidDate(String),

    #[error("Invalid month key: {0}")]
    InvalidMonthKey(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

/// Parses a strict ISO calendar date
///
/// The text must match `^\d{4}-\d{2}-\d{2}$` and name a real date, so
/// `2025-02-30` is rejected even though it has the right shape.
///
/// # Example
///
/// ```rust
/// use core_kernel::parse_iso_date;
///
/// assert!(parse_iso_date("2025-01-10").is_ok());
/// assert!(parse_iso_date("2025-1-10").is_err());
/// assert!(parse_iso_date("2025-02-30").is_err());
/// ```
pub fn parse_iso_date(input: &str) -> Result<NaiveDate, TemporalError> {
    let text = input.trim();
    if !has_iso_shape(text) {
        return Err(TemporalError::InvalidFormat(text.to_string()));
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| TemporalError::InvalidDate(text.to_string()))
}

/// Normalizes a stored or user-supplied date to a calendar date
///
/// Accepts a strict ISO date, an RFC 3339 timestamp (its UTC calendar date),
/// or anything whose first ten characters form an ISO date
/// (`2025-12-05T10:00:00` style values written by date pickers).
pub fn normalize_date(input: &str) -> Result<NaiveDate, TemporalError> {
    let text = input.trim();

    if let Ok(date) = parse_iso_date(text) {
        return Ok(date);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Ok(timestamp.with_timezone(&Utc).date_naive());
    }

    text.get(..10)
        .filter(|_| text.len() > 10 && text.as_bytes()[10] == b'T')
        .and_then(|prefix| parse_iso_date(prefix).ok())
        .ok_or_else(|| TemporalError::InvalidDate(text.to_string()))
}

fn has_iso_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Returns true if both dates fall in the same calendar year and month
pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Returns the number of days in the given month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

/// Builds the date for a billing day in a month, clamping to the month's end
///
/// A loan billed on the 31st is due on the 28th/29th in February and on the
/// 30th in 30-day months.
pub fn clamp_to_month(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let day = day.clamp(1, days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

/// A calendar month, displayed as `"{year}-{month:02}"`
///
/// Used as the billing-cycle key for EMI payments and as the storage key
/// suffix for monthly progress values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Creates a month key, validating the month number
    pub fn new(year: i32, month: u32) -> Result<Self, TemporalError> {
        if !(1..=12).contains(&month) {
            return Err(TemporalError::InvalidMonthKey(format!("{}-{}", year, month)));
        }
        Ok(Self { year, month })
    }

    /// Returns the month containing the given date
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Returns the first day of this month
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Returns the number of days in this month
    pub fn days(&self) -> u32 {
        days_in_month(self.year, self.month)
    }

    /// Returns the month `count` months after this one
    pub fn add_months(&self, count: u32) -> Self {
        let zero_based = self.year as i64 * 12 + (self.month as i64 - 1) + count as i64;
        Self {
            year: (zero_based.div_euclid(12)) as i32,
            month: (zero_based.rem_euclid(12) + 1) as u32,
        }
    }

    /// Returns the following month
    pub fn next(&self) -> Self {
        self.add_months(1)
    }

    /// Returns true if the date falls in this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TemporalError::InvalidMonthKey(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl Serialize for MonthKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
