//! Monthly manual progress
//!
//! A single net amount per calendar month that the user adjusts by deltas,
//! e.g. money set aside towards this month's EMIs. Each month is stored
//! under its own key.
//!
//! Updates are read-modify-write against the store, so the tracker applies
//! them one at a time.

use std::sync::Arc;

use core_kernel::{read_number, KeyValueStore, KeyValueStoreExt, MonthKey};
use rust_decimal::Decimal;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::LoanStorageKeys;

pub struct ProgressTracker {
    store: Arc<dyn KeyValueStore>,
    prefix: String,
    /// Held across the load and save of an update
    write_lock: Mutex<()>,
}

impl ProgressTracker {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: &LoanStorageKeys) -> Self {
        Self {
            store,
            prefix: keys.progress_prefix.clone(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store key for the given month
    pub fn key_for(&self, month: MonthKey) -> String {
        format!("{}{}", self.prefix, month)
    }

    /// Current value for `month`; missing or unreadable values read as zero
    pub async fn get(&self, month: MonthKey) -> Decimal {
        let key = self.key_for(month);
        match self.store.load_json::<Value>(&key).await {
            Ok(Some(value)) => read_number(&value).unwrap_or_else(|| {
                warn!(%key, "Stored progress is not a number, using zero");
                Decimal::ZERO
            }),
            Ok(None) => Decimal::ZERO,
            Err(e) => {
                warn!(%key, error = %e, "Failed to load progress");
                Decimal::ZERO
            }
        }
    }

    /// Adds `delta` (possibly negative) and returns the new value
    ///
    /// The value never drops below zero. Concurrent calls are serialized, so
    /// no delta is lost.
    pub async fn apply_delta(&self, month: MonthKey, delta: Decimal) -> Decimal {
        let _guard = self.write_lock.lock().await;
        let current = self.get(month).await;
        let updated = current.saturating_add(delta).max(Decimal::ZERO);

        let key = self.key_for(month);
        let stored = rust_decimal::prelude::ToPrimitive::to_f64(&updated)
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null);
        if let Err(e) = self.store.save_json(&key, &stored).await {
            warn!(%key, error = %e, "Failed to save progress");
        }

        info!(%month, %delta, value = %updated, "Monthly progress updated");
        updated
    }
}
