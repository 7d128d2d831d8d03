//! Monthly EMI planner
//!
//! Turns the loan collection into the cash needed this month and over a
//! short look-ahead window.

use chrono::NaiveDate;
use core_kernel::{sum_amounts, MonthKey};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::loan::Loan;
use crate::schedule::next_emi_date;

/// Cash plan for the current month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPlan {
    pub month: MonthKey,
    /// EMIs of all loans that are not completed
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_outflow: Decimal,
    pub days_in_month: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_per_day: Decimal,
    pub window_days: u32,
    /// EMIs falling due within the window, today included
    #[serde(with = "rust_decimal::serde::float")]
    pub due_in_window: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub window_average_per_day: Decimal,
}

impl MonthlyPlan {
    /// True if there is anything to pay this month
    pub fn has_outflow(&self) -> bool {
        self.monthly_outflow > Decimal::ZERO
    }
}

pub fn monthly_outflow(loans: &[Loan]) -> Decimal {
    sum_amounts(
        loans
            .iter()
            .filter(|loan| !loan.is_completed())
            .map(|loan| loan.emi_amount.max(Decimal::ZERO)),
    )
}

/// Sum of EMIs whose next due date is fewer than `window_days` days away
pub fn due_within(loans: &[Loan], today: NaiveDate, window_days: u32) -> Decimal {
    sum_amounts(
        loans
            .iter()
            .filter(|loan| loan.has_emi() && !loan.is_completed())
            .filter_map(|loan| {
                let due_on = next_emi_date(loan.emi_day_of_month?, today)?;
                let diff = (due_on - today).num_days();
                (0..i64::from(window_days))
                    .contains(&diff)
                    .then_some(loan.emi_amount)
            }),
    )
}

/// Builds the plan for the month containing `today`
pub fn plan_month(loans: &[Loan], today: NaiveDate, window_days: u32) -> MonthlyPlan {
    let month = MonthKey::from_date(today);
    let days_in_month = month.days();
    let outflow = monthly_outflow(loans);
    let due = due_within(loans, today, window_days);

    MonthlyPlan {
        month,
        monthly_outflow: outflow,
        days_in_month,
        average_per_day: per_day(outflow, days_in_month),
        window_days,
        due_in_window: due,
        window_average_per_day: per_day(due, window_days),
    }
}

/// Percent of `target` covered by `progress`, capped at 100
///
/// Zero when the target is not positive.
pub fn progress_percent(progress: Decimal, target: Decimal) -> u32 {
    if target <= Decimal::ZERO {
        return 0;
    }
    let ratio = match progress.checked_div(target) {
        Some(ratio) => ratio.clamp(Decimal::ZERO, Decimal::ONE),
        None if progress.is_sign_negative() => Decimal::ZERO,
        None => Decimal::ONE,
    };
    (ratio * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}

fn per_day(amount: Decimal, days: u32) -> Decimal {
    if amount <= Decimal::ZERO || days == 0 {
        return Decimal::ZERO;
    }
    (amount / Decimal::from(days)).round_dp(core_kernel::AMOUNT_PRECISION)
}
