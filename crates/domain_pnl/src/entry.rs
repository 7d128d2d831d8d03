//! Capital snapshots
//!
//! An entry records the total capital on one date. Entries are keyed by
//! their date, so `id` always equals `date`.

use chrono::NaiveDate;
use core_kernel::{normalize_date, parse_amount, parse_iso_date, TemporalError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PnlError;

/// A dated capital snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredEntry")]
pub struct PnlEntry {
    pub id: NaiveDate,
    pub date: NaiveDate,
    /// Absolute capital on `date`, not a change
    #[serde(with = "rust_decimal::serde::float")]
    pub capital: Decimal,
}

impl PnlEntry {
    pub fn new(date: NaiveDate, capital: Decimal) -> Self {
        Self {
            id: date,
            date,
            capital,
        }
    }

    /// Capital relative to `baseline`, saturating at the bounds of `Decimal`
    pub fn delta(&self, baseline: Decimal) -> Decimal {
        self.capital.saturating_sub(baseline)
    }
}

/// Persisted shape; the stored id is ignored and rebuilt from the date
#[derive(Deserialize)]
struct StoredEntry {
    date: String,
    #[serde(with = "rust_decimal::serde::float")]
    capital: Decimal,
}

impl TryFrom<StoredEntry> for PnlEntry {
    type Error = TemporalError;

    fn try_from(stored: StoredEntry) -> Result<Self, Self::Error> {
        normalize_date(&stored.date).map(|date| PnlEntry::new(date, stored.capital))
    }
}

/// Raw text of the entry form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryForm {
    pub date: String,
    pub capital: String,
}

impl EntryForm {
    /// Validates the date shape and reads the capital
    ///
    /// # Example
    ///
    /// ```rust
    /// use domain_pnl::EntryForm;
    ///
    /// let form = EntryForm { date: "2025-12-11".into(), capital: "1,050.5".into() };
    /// let (date, capital) = form.parse().unwrap();
    /// assert_eq!(date.to_string(), "2025-12-11");
    /// assert_eq!(capital.to_string(), "1050.5");
    /// ```
    pub fn parse(&self) -> Result<(NaiveDate, Decimal), PnlError> {
        let date = parse_iso_date(&self.date)?;
        let capital = parse_amount(&self.capital)?;
        Ok((date, capital))
    }
}

/// An entry as listed, with its delta when a baseline is saved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntryView {
    pub id: NaiveDate,
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub capital: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub delta: Option<Decimal>,
}

/// One page of entries, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntriesPage {
    pub items: Vec<EntryView>,
    pub total: usize,
    pub offset: usize,
    pub has_more: bool,
}
