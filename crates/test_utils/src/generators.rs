//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use chrono::{Days, NaiveDate};
use core_kernel::LoanId;
use domain_loans::Loan;
use domain_pnl::PnlEntry;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for outstanding balances, 0.01 to 10,000,000.00
pub fn balance_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for annual rates, 0.00% to 36.00%
pub fn rate_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..3600i64).prop_map(|basis| Decimal::new(basis, 2))
}

/// Strategy for EMI amounts, 1.00 to 500,000.00
pub fn emi_strategy() -> impl Strategy<Value = Decimal> {
    (100i64..50_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for billing days, including days some months lack
pub fn billing_day_strategy() -> impl Strategy<Value = u32> {
    1u32..=31u32
}

/// Strategy for dates in 2024 and 2025
pub fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0u64..731u64).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default() + Days::new(offset)
    })
}

/// Strategy for signed capital figures with two decimals
pub fn capital_strategy() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for loans with a billing day and an optional EMI count
pub fn loan_strategy() -> impl Strategy<Value = Loan> {
    (
        balance_strategy(),
        rate_strategy(),
        emi_strategy(),
        billing_day_strategy(),
        proptest::option::of(1u32..120u32),
        0u32..120u32,
    )
        .prop_map(|(balance, rate, emi, day, total, paid)| Loan {
            id: LoanId::new_v7(),
            name: "generated".to_string(),
            lender: "generated".to_string(),
            remaining_amount: balance,
            interest_rate: rate,
            emi_amount: emi,
            due_date: None,
            emi_day_of_month: Some(day),
            last_emi_paid_date: None,
            total_emis: total,
            emis_paid_count: total.map_or(paid, |t| paid.min(t)),
            total_interest_paid: Decimal::ZERO,
        })
}

/// Strategy for PnL snapshots, dates may repeat
pub fn pnl_entries_strategy(max_len: usize) -> impl Strategy<Value = Vec<PnlEntry>> {
    proptest::collection::vec((date_strategy(), capital_strategy()), 0..max_len)
        .prop_map(|raw| {
            raw.into_iter()
                .map(|(date, capital)| PnlEntry::new(date, capital))
                .collect()
        })
}
