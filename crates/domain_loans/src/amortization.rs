//! Reducing-balance amortization
//!
//! Interest for a cycle is charged on the outstanding balance at the annual
//! rate divided by twelve. Whatever is left of the EMI after interest reduces
//! the principal; when interest meets or exceeds the EMI the principal does
//! not move but the interest is still recorded.
//!
//! All arithmetic is checked: amounts whose products or quotients leave the
//! range of `Decimal` yield `None`.

use core_kernel::AMOUNT_PRECISION;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;

/// How one EMI splits into interest and principal
///
/// `interest` is already rounded to [`AMOUNT_PRECISION`] places, and that
/// rounded figure is what accumulates into a loan's `totalInterestPaid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentBreakdown {
    #[serde(with = "rust_decimal::serde::float")]
    pub interest: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub principal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub new_balance: Decimal,
}

/// Interest accrued on `balance` over one month at `annual_rate` percent
///
/// Rounded half away from zero to [`AMOUNT_PRECISION`] places.
pub fn monthly_interest(balance: Decimal, annual_rate: Decimal) -> Option<Decimal> {
    let interest = balance.checked_mul(annual_rate)?.checked_div(dec!(1200))?;
    Some(interest.round_dp_with_strategy(AMOUNT_PRECISION, RoundingStrategy::MidpointAwayFromZero))
}

/// Splits one EMI against the current balance
///
/// # Example
///
/// ```rust
/// use domain_loans::amortization::split_installment;
/// use rust_decimal_macros::dec;
///
/// let split = split_installment(dec!(1200), dec!(12), dec!(110)).unwrap();
/// assert_eq!(split.interest, dec!(12));
/// assert_eq!(split.principal, dec!(98));
/// assert_eq!(split.new_balance, dec!(1102));
/// ```
pub fn split_installment(
    balance: Decimal,
    annual_rate: Decimal,
    emi: Decimal,
) -> Option<InstallmentBreakdown> {
    let interest = monthly_interest(balance, annual_rate)?;
    let principal = emi.checked_sub(interest)?.max(Decimal::ZERO);
    let new_balance = balance.checked_sub(principal)?.max(Decimal::ZERO);
    Some(InstallmentBreakdown {
        interest,
        principal,
        new_balance,
    })
}

/// Number of installments needed to cover `balance` ignoring interest
///
/// Returns `None` unless both amounts are positive and the count fits in a
/// `u32`.
pub fn installments_needed(balance: Decimal, emi: Decimal) -> Option<u32> {
    if balance <= Decimal::ZERO || emi <= Decimal::ZERO {
        return None;
    }
    balance.checked_div(emi)?.ceil().to_u32()
}
