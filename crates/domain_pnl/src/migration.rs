//! Legacy layout migration
//!
//! The first version tracked two sub-accounts (`intraday` and `swing`), one
//! record per date and account, with a baseline object holding one value per
//! account. The current layout has one capital figure per date and a single
//! baseline number. Migration folds the accounts together:
//!
//! ```text
//! legacy:  2025-01-01 intraday 60, 2025-01-01 swing 40, 2025-01-02 swing 55
//! current: 2025-01-01 100,        2025-01-02 55
//! ```
//!
//! Records that cannot be read are dropped; the rest still migrate.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use core_kernel::{normalize_date, read_number, sum_amounts};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::warn;

use crate::entry::PnlEntry;

/// Sub-accounts of the legacy layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Account {
    Intraday,
    Swing,
}

impl Account {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "intraday" => Some(Account::Intraday),
            "swing" => Some(Account::Swing),
            _ => None,
        }
    }
}

/// Result of folding the legacy data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigratedLedger {
    /// One entry per legacy date, ascending
    pub entries: Vec<PnlEntry>,
    /// Sum of both account baselines
    pub baseline: Decimal,
    pub baseline_saved: bool,
    /// Legacy records that could not be read
    pub dropped: usize,
}

/// Folds legacy entries and baseline into the current layout
///
/// Either input may be absent. A value of the wrong shape counts as empty.
pub fn migrate_legacy(entries: Option<&Value>, baseline: Option<&Value>) -> MigratedLedger {
    let mut by_date: BTreeMap<NaiveDate, BTreeMap<Account, Decimal>> = BTreeMap::new();
    let mut dropped = 0;

    match entries {
        Some(Value::Array(records)) => {
            for (index, record) in records.iter().enumerate() {
                match read_legacy_record(record) {
                    Some((date, account, capital)) => {
                        by_date.entry(date).or_default().insert(account, capital);
                    }
                    None => {
                        warn!(index, "Dropping unreadable legacy PnL record");
                        dropped += 1;
                    }
                }
            }
        }
        Some(other) if !other.is_null() => {
            warn!("Legacy PnL entries are not a list, nothing to migrate");
        }
        _ => {}
    }

    let entries = by_date
        .into_iter()
        .map(|(date, accounts)| PnlEntry::new(date, sum_amounts(accounts.values().copied())))
        .collect();

    let (baseline, baseline_saved) = baseline.map(read_legacy_baseline).unwrap_or_default();

    MigratedLedger {
        entries,
        baseline,
        baseline_saved,
        dropped,
    }
}

fn read_legacy_record(record: &Value) -> Option<(NaiveDate, Account, Decimal)> {
    let date = normalize_date(record.get("date")?.as_str()?).ok()?;
    let account = Account::parse(record.get("account")?.as_str()?)?;
    let capital = read_number(record.get("capital")?)?;
    Some((date, account, capital))
}

fn read_legacy_baseline(value: &Value) -> (Decimal, bool) {
    match value {
        Value::Object(fields) => {
            let part = |name: &str| fields.get(name).and_then(read_number).unwrap_or_default();
            let saved = fields.get("saved").and_then(Value::as_bool).unwrap_or(false);
            (part("intraday").saturating_add(part("swing")), saved)
        }
        _ => {
            warn!("Legacy PnL baseline is not an object, ignoring it");
            (Decimal::ZERO, false)
        }
    }
}
