//! Recovery Domain - Capital Snapshots Against a Baseline
//!
//! This crate tracks trading capital recovery: the user saves a starting
//! capital (the baseline) once, then records absolute capital snapshots by
//! date. Every figure shown is derived on read as `capital - baseline`.
//!
//! # Key Concepts
//!
//! - **Baseline**: starting capital; until it is saved the ledger is
//!   uninitialized and no deltas exist
//! - **Entry**: the capital on one date; one entry per date
//! - **Bucket**: a daily, weekly or monthly group of entries for charting
//!
//! # Storage layout
//!
//! Entries, baseline and the saved flag live under separate keys. Data from
//! the first, per-account layout is migrated once on load, see [`migration`].

pub mod aggregate;
pub mod config;
pub mod entry;
pub mod error;
pub mod ledger;
pub mod migration;

pub use aggregate::{aggregate, bucket_key, week_of_year, ChartSeries, ViewMode};
pub use config::{PnlConfig, PnlStorageKeys};
pub use entry::{EntriesPage, EntryForm, EntryView, PnlEntry};
pub use error::PnlError;
pub use ledger::{LedgerState, PnlLedger, RecoverySummary};
pub use migration::{migrate_legacy, MigratedLedger};

use rust_decimal::Decimal;

/// Reads an edited capital value
///
/// Accepts `,` as a decimal separator when no `.` is present, since numeric
/// keyboards in some locales produce `980,5`.
///
/// # Example
///
/// ```rust
/// use domain_pnl::parse_capital;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(parse_capital("980,5").unwrap(), dec!(980.5));
/// assert_eq!(parse_capital("1050.25").unwrap(), dec!(1050.25));
/// ```
pub fn parse_capital(input: &str) -> Result<Decimal, PnlError> {
    let trimmed = input.trim();
    let normalized = if !trimmed.contains('.') && trimmed.matches(',').count() == 1 {
        trimmed.replace(',', ".")
    } else {
        trimmed.to_string()
    };
    Ok(core_kernel::parse_amount(&normalized)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_capital() {
        assert_eq!(parse_capital("-12,75").unwrap(), dec!(-12.75));
        assert_eq!(parse_capital("1,234.5").unwrap(), dec!(1234.5));
        assert!(parse_capital("").is_err());
        assert!(parse_capital("abc").is_err());
    }
}
