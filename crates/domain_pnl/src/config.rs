//! PnL ledger configuration

use serde::Deserialize;

/// Store keys for the current and the legacy layout
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PnlStorageKeys {
    pub entries: String,
    pub baseline: String,
    pub baseline_saved: String,
    /// Per-account entries written by the first version
    pub legacy_entries: String,
    /// `{intraday, swing, saved}` object written by the first version
    pub legacy_baseline: String,
}

impl Default for PnlStorageKeys {
    fn default() -> Self {
        Self {
            entries: "pnlTracker_entries_v2".to_string(),
            baseline: "pnlTracker_baseline_v2".to_string(),
            baseline_saved: "pnlTracker_baselineSaved_v2".to_string(),
            legacy_entries: "pnlTracker_entries".to_string(),
            legacy_baseline: "pnlTracker_baseline".to_string(),
        }
    }
}

impl PnlStorageKeys {
    /// Keys of the current layout
    pub fn current(&self) -> [&str; 3] {
        [&self.entries, &self.baseline, &self.baseline_saved]
    }

    /// Keys of the legacy layout
    pub fn legacy(&self) -> [&str; 2] {
        [&self.legacy_entries, &self.legacy_baseline]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PnlConfig {
    pub keys: PnlStorageKeys,
    /// Reject entry changes until a baseline is saved
    pub require_baseline: bool,
}

impl Default for PnlConfig {
    fn default() -> Self {
        Self {
            keys: PnlStorageKeys::default(),
            require_baseline: true,
        }
    }
}
