//! Recovery ledger
//!
//! Holds the baseline and the dated capital snapshots, migrates the legacy
//! layout on first load and persists every change.

use std::sync::Arc;

use chrono::NaiveDate;
use core_kernel::{read_number, KeyValueStore, KeyValueStoreExt};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::aggregate::{aggregate, ChartSeries, ViewMode};
use crate::config::PnlConfig;
use crate::entry::{EntriesPage, EntryView, PnlEntry};
use crate::error::PnlError;
use crate::migration::migrate_legacy;

/// Whether a baseline has been saved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerState {
    Uninitialized,
    Active,
}

/// Headline recovery figures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecoverySummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub baseline: Decimal,
    /// Capital of the latest entry by date, or the baseline without entries
    #[serde(with = "rust_decimal::serde::float")]
    pub current: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub delta: Decimal,
}

/// The recovery ledger
///
/// Starts loading; [`PnlLedger::hydrate`] reads (or migrates) the stored
/// data and always ends loading. Changes update memory first and are then
/// written to the store; a failed write is logged only.
pub struct PnlLedger {
    store: Arc<dyn KeyValueStore>,
    config: PnlConfig,
    entries: Vec<PnlEntry>,
    baseline: Decimal,
    baseline_saved: bool,
    loading: bool,
}

impl PnlLedger {
    pub fn new(store: Arc<dyn KeyValueStore>, config: PnlConfig) -> Self {
        Self {
            store,
            config,
            entries: Vec::new(),
            baseline: Decimal::ZERO,
            baseline_saved: false,
            loading: true,
        }
    }

    /// Creates a ledger and hydrates it from the store
    pub async fn load(store: Arc<dyn KeyValueStore>, config: PnlConfig) -> Self {
        let mut ledger = Self::new(store, config);
        ledger.hydrate().await;
        ledger
    }

    /// Reads the current layout, or migrates the legacy one if only that exists
    ///
    /// Migration needs positive proof that the current layout is absent:
    /// every current key must read back as missing. If any key cannot be
    /// read, whatever was readable is loaded and nothing is migrated or
    /// written, so a later load can still see the stored data.
    pub async fn hydrate(&mut self) {
        let keys = self.config.keys.clone();

        let current = self.load_values(&keys.current()).await;
        if current.found_any() || !current.is_complete() {
            if !current.is_complete() {
                warn!(
                    unavailable = current.unavailable,
                    "PnL data could not be fully read, legacy migration skipped"
                );
            }
            let [entries, baseline, saved] = current.values;
            self.entries = decode_entries(entries);
            self.baseline = baseline.as_ref().and_then(read_number).unwrap_or_default();
            self.baseline_saved = saved.as_ref().and_then(Value::as_bool).unwrap_or(false);
        } else {
            let legacy = self.load_values(&keys.legacy()).await;
            if !legacy.is_complete() {
                warn!(
                    unavailable = legacy.unavailable,
                    "Legacy PnL data could not be fully read, migration postponed"
                );
            } else if legacy.found_any() {
                let [legacy_entries, legacy_baseline] = legacy.values;
                let migrated = migrate_legacy(legacy_entries.as_ref(), legacy_baseline.as_ref());
                info!(
                    entries = migrated.entries.len(),
                    dropped = migrated.dropped,
                    "Migrated legacy PnL data"
                );
                self.entries = migrated.entries;
                self.baseline = migrated.baseline;
                self.baseline_saved = migrated.baseline_saved;
                self.persist_all().await;
            }
        }

        self.loading = false;
        info!(
            entries = self.entries.len(),
            state = ?self.state(),
            "PnL ledger hydrated"
        );
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn state(&self) -> LedgerState {
        if self.baseline_saved {
            LedgerState::Active
        } else {
            LedgerState::Uninitialized
        }
    }

    /// The saved baseline; `None` until one is saved
    pub fn baseline(&self) -> Option<Decimal> {
        self.baseline_saved.then_some(self.baseline)
    }

    /// Entries in stored order
    pub fn entries(&self) -> &[PnlEntry] {
        &self.entries
    }

    pub fn get(&self, id: NaiveDate) -> Option<&PnlEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Stores the starting capital and activates the ledger
    ///
    /// # Errors
    ///
    /// `PnlError::BaselineAlreadySaved` once a baseline exists; reset first.
    pub async fn save_baseline(&mut self, value: Decimal) -> Result<(), PnlError> {
        self.ensure_ready("save_baseline")?;
        if self.baseline_saved {
            return Err(PnlError::BaselineAlreadySaved);
        }

        self.baseline = value;
        self.baseline_saved = true;
        info!(baseline = %value, "PnL baseline saved");
        self.persist_baseline().await;
        Ok(())
    }

    /// Records the capital for `date`, replacing any entry for that date
    pub async fn save_entry(&mut self, date: NaiveDate, capital: Decimal) -> Result<PnlEntry, PnlError> {
        self.ensure_ready("save_entry")?;
        self.ensure_baseline()?;

        let entry = PnlEntry::new(date, capital);
        self.entries.retain(|existing| existing.date != date);
        self.entries.push(entry);

        info!(%date, %capital, "PnL entry saved");
        self.persist_entries().await;
        Ok(entry)
    }

    /// Replaces the capital of an entry; returns false if the id is unknown
    pub async fn edit_entry(&mut self, id: NaiveDate, capital: Decimal) -> Result<bool, PnlError> {
        self.ensure_ready("edit_entry")?;
        self.ensure_baseline()?;

        let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) else {
            debug!(%id, "Edit for unknown PnL entry ignored");
            return Ok(false);
        };
        entry.capital = capital;

        info!(%id, %capital, "PnL entry edited");
        self.persist_entries().await;
        Ok(true)
    }

    /// Removes an entry; returns false if the id is unknown
    pub async fn delete_entry(&mut self, id: NaiveDate) -> Result<bool, PnlError> {
        self.ensure_ready("delete_entry")?;
        self.ensure_baseline()?;

        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        if self.entries.len() == before {
            debug!(%id, "Delete for unknown PnL entry ignored");
            return Ok(false);
        }

        info!(%id, "PnL entry deleted");
        self.persist_entries().await;
        Ok(true)
    }

    /// Clears entries, baseline and flag
    ///
    /// The entries key is kept (as an empty list) so legacy data is never
    /// migrated a second time.
    pub async fn reset_all(&mut self) -> Result<(), PnlError> {
        self.ensure_ready("reset_all")?;

        self.entries.clear();
        self.baseline = Decimal::ZERO;
        self.baseline_saved = false;
        info!("PnL ledger reset");

        let keys = &self.config.keys;
        self.save(&keys.entries, &self.entries).await;
        self.save(&keys.baseline_saved, &false).await;
        if let Err(e) = self.store.remove(&[keys.baseline.as_str()]).await {
            warn!(key = %keys.baseline, error = %e, "Failed to remove PnL baseline");
        }
        Ok(())
    }

    /// Baseline, current capital and delta; `None` until a baseline is saved
    pub fn summary(&self) -> Option<RecoverySummary> {
        let baseline = self.baseline()?;
        let current = self
            .entries
            .iter()
            .max_by_key(|entry| entry.date)
            .map_or(baseline, |entry| entry.capital);
        Some(RecoverySummary {
            baseline,
            current,
            delta: current.saturating_sub(baseline),
        })
    }

    /// Entries newest first, `limit` at a time
    pub fn entries_page(&self, offset: usize, limit: usize) -> EntriesPage {
        let baseline = self.baseline();
        let mut sorted: Vec<&PnlEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));

        let total = sorted.len();
        let items: Vec<EntryView> = sorted
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|entry| EntryView {
                id: entry.id,
                date: entry.date,
                capital: entry.capital,
                delta: baseline.map(|b| entry.delta(b)),
            })
            .collect();

        EntriesPage {
            has_more: offset.saturating_add(items.len()) < total,
            items,
            total,
            offset,
        }
    }

    /// Delta series for charting; `None` until a baseline is saved
    pub fn series(&self, mode: ViewMode) -> Option<ChartSeries> {
        self.baseline()
            .map(|baseline| aggregate(&self.entries, baseline, mode))
    }

    fn ensure_ready(&self, operation: &'static str) -> Result<(), PnlError> {
        if self.loading {
            warn!(operation, "PnL ledger mutation suppressed while loading");
            return Err(PnlError::NotReady);
        }
        Ok(())
    }

    fn ensure_baseline(&self) -> Result<(), PnlError> {
        if self.config.require_baseline && !self.baseline_saved {
            return Err(PnlError::BaselineRequired);
        }
        Ok(())
    }

    async fn load_values<const N: usize>(&self, keys: &[&str; N]) -> LoadedValues<N> {
        let mut loaded = LoadedValues {
            values: std::array::from_fn(|_| None),
            corrupt: 0,
            unavailable: 0,
        };
        for (slot, key) in loaded.values.iter_mut().zip(keys.iter()) {
            match self.store.load_json::<Value>(key).await {
                Ok(value) => *slot = value,
                Err(e) if e.is_corrupt_value() => {
                    warn!(%key, error = %e, "Stored PnL value is unreadable");
                    loaded.corrupt += 1;
                }
                Err(e) => {
                    warn!(%key, error = %e, "Failed to load PnL value");
                    loaded.unavailable += 1;
                }
            }
        }
        loaded
    }

    async fn persist_entries(&self) {
        self.save(&self.config.keys.entries, &self.entries).await;
    }

    async fn persist_baseline(&self) {
        let keys = &self.config.keys;
        self.save(&keys.baseline, &decimal_value(self.baseline)).await;
        self.save(&keys.baseline_saved, &self.baseline_saved).await;
    }

    async fn persist_all(&self) {
        self.persist_entries().await;
        self.persist_baseline().await;
    }

    async fn save<T: Serialize + Sync + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = self.store.save_json(key, value).await {
            warn!(%key, error = %e, "Failed to save PnL value");
        }
    }
}

/// Values read for a group of keys
struct LoadedValues<const N: usize> {
    values: [Option<Value>; N],
    /// Keys that exist but hold undecodable bytes
    corrupt: usize,
    /// Keys whose read failed
    unavailable: usize,
}

impl<const N: usize> LoadedValues<N> {
    /// True if any key exists, readable or not
    fn found_any(&self) -> bool {
        self.corrupt > 0 || self.values.iter().any(Option::is_some)
    }

    fn is_complete(&self) -> bool {
        self.unavailable == 0
    }
}

fn decode_entries(value: Option<Value>) -> Vec<PnlEntry> {
    match value {
        Some(Value::Array(records)) => records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value::<PnlEntry>(record) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(index, error = %e, "Dropping malformed PnL entry");
                    None
                }
            })
            .collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(_) => {
            warn!("Stored PnL entries are not a list, starting empty");
            Vec::new()
        }
    }
}

fn decimal_value(value: Decimal) -> Value {
    rust_decimal::prelude::ToPrimitive::to_f64(&value)
        .and_then(serde_json::Number::from_f64)
        .map_or(Value::Null, Value::Number)
}
