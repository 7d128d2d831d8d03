//! EMI progress projection

use serde::Serialize;

use crate::loan::Loan;

/// Progress figures for one loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiStats {
    pub total_emis: Option<u32>,
    pub emis_paid_count: u32,
    pub emis_remaining: Option<u32>,
    /// Whole percent, 0-100
    pub progress_pct: u32,
}

impl EmiStats {
    const EMPTY: EmiStats = EmiStats {
        total_emis: None,
        emis_paid_count: 0,
        emis_remaining: None,
        progress_pct: 0,
    };
}

/// Derives progress figures for a loan; an absent loan yields empty stats
///
/// # Example
///
/// ```rust,ignore
/// let stats = get_emi_stats(ledger.get(&id));
/// println!("{}% paid", stats.progress_pct);
/// ```
pub fn get_emi_stats(loan: Option<&Loan>) -> EmiStats {
    let Some(loan) = loan else {
        return EmiStats::EMPTY;
    };

    let progress_pct = match loan.total_emis {
        Some(total) if total > 0 => rounded_percent(loan.emis_paid_count, total).min(100),
        _ => 0,
    };

    EmiStats {
        total_emis: loan.total_emis,
        emis_paid_count: loan.emis_paid_count,
        emis_remaining: loan.emis_remaining(),
        progress_pct,
    }
}

/// `round(part / whole * 100)` with halves rounded up
fn rounded_percent(part: u32, whole: u32) -> u32 {
    let part = u64::from(part);
    let whole = u64::from(whole);
    let pct = (part * 200 + whole) / (2 * whole);
    u32::try_from(pct).unwrap_or(u32::MAX)
}
