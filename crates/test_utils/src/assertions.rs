//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use domain_loans::{InstallmentBreakdown, Loan, PaymentOutcome};
use domain_pnl::ChartSeries;
use rust_decimal::Decimal;

/// Asserts that two decimals are equal within `tolerance`
pub fn assert_decimal_approx_eq(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "Decimals differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual,
        expected,
        diff,
        tolerance
    );
}

/// Asserts that the payment was applied and returns its breakdown
pub fn assert_applied(outcome: &PaymentOutcome) -> InstallmentBreakdown {
    match outcome {
        PaymentOutcome::Applied(split) => *split,
        other => panic!("Expected an applied payment, got {:?}", other),
    }
}

/// Asserts that no loan carries a negative balance
pub fn assert_loans_consistent(loans: &[Loan]) {
    for loan in loans {
        assert!(
            loan.remaining_amount >= Decimal::ZERO,
            "Loan {} has a negative balance: {}",
            loan.id,
            loan.remaining_amount
        );
    }
}

/// Asserts that a chart series has one label per value
pub fn assert_series_aligned(series: &ChartSeries) {
    assert_eq!(
        series.labels.len(),
        series.values.len(),
        "Series labels and values differ in length: {:?}",
        series
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::LoanFixtures;
    use rust_decimal_macros::dec;

    #[test]
    fn test_assert_decimal_approx_eq() {
        assert_decimal_approx_eq(dec!(100.001), dec!(100.002), dec!(0.01));
    }

    #[test]
    #[should_panic(expected = "Decimals differ")]
    fn test_assert_decimal_approx_eq_fails() {
        assert_decimal_approx_eq(dec!(100), dec!(101), dec!(0.5));
    }

    #[test]
    #[should_panic(expected = "Expected an applied payment")]
    fn test_assert_applied_fails_for_noop() {
        assert_applied(&PaymentOutcome::AlreadyPaidThisMonth);
    }

    #[test]
    fn test_fixture_loans_are_consistent() {
        assert_loans_consistent(&[
            LoanFixtures::car_loan(),
            LoanFixtures::personal_loan(),
            LoanFixtures::completed_loan(),
        ]);
    }
}
