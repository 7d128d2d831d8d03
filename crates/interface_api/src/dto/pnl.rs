//! PnL DTOs

use core_kernel::format_signed;
use domain_pnl::{LedgerState, PnlLedger, RecoverySummary};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::number_or_text;

/// Body of `POST /pnl/baseline`
#[derive(Debug, Deserialize)]
pub struct BaselineRequest {
    #[serde(deserialize_with = "number_or_text")]
    pub capital: String,
}

/// Body of `POST /pnl/entries`
#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    pub date: String,
    #[serde(deserialize_with = "number_or_text")]
    pub capital: String,
}

/// Body of `PATCH /pnl/entries/:id`
#[derive(Debug, Deserialize)]
pub struct EditEntryRequest {
    #[serde(deserialize_with = "number_or_text")]
    pub capital: String,
}

/// Query of `GET /pnl/entries`
#[derive(Debug, Deserialize, Validate)]
pub struct EntriesQuery {
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 500))]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

/// Query of `GET /pnl/series`
#[derive(Debug, Default, Deserialize)]
pub struct SeriesQuery {
    #[serde(default)]
    pub mode: Option<String>,
}

/// Body of `GET /pnl`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlOverview {
    pub state: LedgerState,
    pub loading: bool,
    pub entry_count: usize,
    pub summary: Option<RecoverySummary>,
    /// Recovered delta with an explicit sign, e.g. `+3500.00`
    pub recovered_display: Option<String>,
}

impl From<&PnlLedger> for PnlOverview {
    fn from(ledger: &PnlLedger) -> Self {
        let summary = ledger.summary();
        PnlOverview {
            state: ledger.state(),
            loading: ledger.is_loading(),
            entry_count: ledger.entries().len(),
            recovered_display: summary.as_ref().map(|s| format_signed(s.delta, 2)),
            summary,
        }
    }
}
