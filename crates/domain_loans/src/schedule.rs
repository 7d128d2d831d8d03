//! EMI schedule projections for the dashboard
//!
//! All functions are pure: they take the loan collection and today's local
//! date and derive what is due, what was paid and when the debt ends.

use chrono::{Datelike, NaiveDate};
use core_kernel::{clamp_to_month, sum_amounts, LoanId, MonthKey};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::loan::Loan;

/// Next date a loan billed on `emi_day` falls due, counting today
///
/// Billing days past the end of a month fall on its last day.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use domain_loans::schedule::next_emi_date;
///
/// let today = NaiveDate::from_ymd_opt(2025, 2, 10).unwrap();
/// assert_eq!(next_emi_date(5, today), NaiveDate::from_ymd_opt(2025, 3, 5));
/// assert_eq!(next_emi_date(31, today), NaiveDate::from_ymd_opt(2025, 2, 28));
/// ```
pub fn next_emi_date(emi_day: u32, today: NaiveDate) -> Option<NaiveDate> {
    let this_month = clamp_to_month(today.year(), today.month(), emi_day)?;
    if this_month >= today {
        return Some(this_month);
    }
    let next = MonthKey::from_date(today).next();
    clamp_to_month(next.year(), next.month(), emi_day)
}

/// An EMI falling due soon
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingEmi {
    pub loan_id: LoanId,
    pub name: String,
    pub lender: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub emi_amount: Decimal,
    pub due_on: NaiveDate,
    pub days_until: i64,
}

/// Loans with a billing day ordered by their next due date
///
/// Loans without a positive EMI and completed loans are left out.
pub fn upcoming_emis(loans: &[Loan], today: NaiveDate, limit: usize) -> Vec<UpcomingEmi> {
    let mut upcoming: Vec<UpcomingEmi> = loans
        .iter()
        .filter(|loan| loan.has_emi() && !loan.is_completed())
        .filter_map(|loan| {
            let due_on = next_emi_date(loan.emi_day_of_month?, today)?;
            Some(UpcomingEmi {
                loan_id: loan.id.clone(),
                name: loan.name.clone(),
                lender: loan.lender.clone(),
                emi_amount: loan.emi_amount,
                due_on,
                days_until: (due_on - today).num_days(),
            })
        })
        .collect();
    upcoming.sort_by_key(|emi| emi.due_on);
    upcoming.truncate(limit);
    upcoming
}

/// A payment recorded in the current month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaidEmi {
    pub loan_id: LoanId,
    pub name: String,
    pub lender: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub emi_amount: Decimal,
    pub paid_on: NaiveDate,
}

/// Payments of the current month, latest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaidThisMonth {
    pub items: Vec<PaidEmi>,
    /// Sum of the listed EMIs
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

pub fn paid_this_month(loans: &[Loan], today: NaiveDate, limit: usize) -> PaidThisMonth {
    let month = MonthKey::from_date(today);
    let mut items: Vec<PaidEmi> = loans
        .iter()
        .filter(|loan| loan.has_emi())
        .filter_map(|loan| {
            let paid_on = loan.last_emi_paid_date.filter(|d| month.contains(*d))?;
            Some(PaidEmi {
                loan_id: loan.id.clone(),
                name: loan.name.clone(),
                lender: loan.lender.clone(),
                emi_amount: loan.emi_amount,
                paid_on,
            })
        })
        .collect();
    items.sort_by(|a, b| b.paid_on.cmp(&a.paid_on));
    items.truncate(limit);

    let total = sum_amounts(items.iter().map(|item| item.emi_amount));
    PaidThisMonth { items, total }
}

/// When the last known EMI schedule ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtFreeHorizon {
    pub months_remaining: u32,
    pub target_month: MonthKey,
}

/// Largest remaining EMI count among loans with a known total
///
/// `None` when no loan has EMIs left to pay.
pub fn debt_free_horizon(loans: &[Loan], today: NaiveDate) -> Option<DebtFreeHorizon> {
    let months_remaining = loans
        .iter()
        .filter_map(Loan::emis_remaining)
        .max()
        .filter(|months| *months > 0)?;
    Some(DebtFreeHorizon {
        months_remaining,
        target_month: MonthKey::from_date(today).add_months(months_remaining),
    })
}
