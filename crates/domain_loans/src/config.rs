//! Loan domain configuration

use serde::Deserialize;

/// Store keys used by the loan ledger and the monthly progress tracker
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoanStorageKeys {
    /// Key holding the loan collection
    pub loans: String,
    /// Prefix for per-month progress values, followed by `YYYY-MM`
    pub progress_prefix: String,
}

impl Default for LoanStorageKeys {
    fn default() -> Self {
        Self {
            loans: "loanTracker_loans".to_string(),
            progress_prefix: "loanTracker_usdtProgress_".to_string(),
        }
    }
}

/// Limits for the dashboard projections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Number of upcoming EMIs listed
    pub upcoming_limit: usize,
    /// Number of payments listed for the current month
    pub paid_limit: usize,
    /// Look-ahead window for the planner, in days
    pub planner_window_days: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            upcoming_limit: 4,
            paid_limit: 6,
            planner_window_days: 10,
        }
    }
}
