//! Period aggregation
//!
//! Groups capital snapshots into daily, weekly or monthly buckets and turns
//! them into a chart series of deltas against the baseline. Within a bucket
//! the latest snapshot wins, since each snapshot is an absolute figure.
//!
//! Week numbers count 7-day blocks from January 1st of the same year
//! (January 1-7 is week 1), not ISO-8601 weeks.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entry::PnlEntry;
use crate::error::PnlError;

/// Bucket size of a series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewMode::Daily => "daily",
            ViewMode::Weekly => "weekly",
            ViewMode::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

impl FromStr for ViewMode {
    type Err = PnlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(ViewMode::Daily),
            "weekly" => Ok(ViewMode::Weekly),
            "monthly" => Ok(ViewMode::Monthly),
            _ => Err(PnlError::InvalidViewMode(s.to_string())),
        }
    }
}

impl ViewMode {
    /// Short chart label for a bucket key of this mode
    ///
    /// Daily `2025-01-10` -> `01-10`, weekly `2025-W02` -> `W02`,
    /// monthly `2025-01` -> `25-01`.
    pub fn label<'a>(&self, key: &'a str) -> &'a str {
        let start = match self {
            ViewMode::Daily | ViewMode::Weekly => 5,
            ViewMode::Monthly => 2,
        };
        key.get(start..).unwrap_or(key)
    }
}

/// Bucket key of `date`
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use domain_pnl::{bucket_key, ViewMode};
///
/// let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
/// assert_eq!(bucket_key(date, ViewMode::Daily), "2025-01-10");
/// assert_eq!(bucket_key(date, ViewMode::Weekly), "2025-W02");
/// assert_eq!(bucket_key(date, ViewMode::Monthly), "2025-01");
/// ```
pub fn bucket_key(date: NaiveDate, mode: ViewMode) -> String {
    match mode {
        ViewMode::Daily => date.format("%Y-%m-%d").to_string(),
        ViewMode::Weekly => format!("{}-W{:02}", date.year(), week_of_year(date)),
        ViewMode::Monthly => format!("{}-{:02}", date.year(), date.month()),
    }
}

/// `floor(days since January 1st / 7) + 1`
pub fn week_of_year(date: NaiveDate) -> u32 {
    date.ordinal0() / 7 + 1
}

/// Parallel labels and values, ascending by bucket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub mode: ViewMode,
    pub labels: Vec<String>,
    #[serde(with = "decimal_list")]
    pub values: Vec<Decimal>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Builds the delta series of `entries` against `baseline`
///
/// Entries need not be sorted.
pub fn aggregate(entries: &[PnlEntry], baseline: Decimal, mode: ViewMode) -> ChartSeries {
    let mut sorted: Vec<&PnlEntry> = entries.iter().collect();
    sorted.sort_by_key(|entry| entry.date);

    let mut buckets: BTreeMap<String, Decimal> = BTreeMap::new();
    for entry in sorted {
        buckets.insert(bucket_key(entry.date, mode), entry.delta(baseline));
    }

    let (labels, values) = buckets
        .into_iter()
        .map(|(key, value)| (mode.label(&key).to_string(), value))
        .unzip();

    ChartSeries {
        mode,
        labels,
        values,
    }
}

mod decimal_list {
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal::Decimal;
    use serde::ser::SerializeSeq;
    use serde::Serializer;

    pub fn serialize<S>(values: &[Decimal], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for value in values {
            seq.serialize_element(&value.to_f64().unwrap_or_default())?;
        }
        seq.end()
    }
}
