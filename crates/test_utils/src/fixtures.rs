//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the loan and PnL ledgers.
//! These fixtures are consistent and predictable for unit tests.

use chrono::NaiveDate;
use core_kernel::LoanId;
use domain_loans::{Loan, NewLoan};
use domain_pnl::PnlEntry;
use rust_decimal_macros::dec;

/// Fixture for calendar dates
pub struct DateFixtures;

impl DateFixtures {
    /// The "today" most tests run against
    pub fn today() -> NaiveDate {
        Self::ymd(2025, 1, 15)
    }

    /// A day in the month before [`DateFixtures::today`]
    pub fn last_month() -> NaiveDate {
        Self::ymd(2024, 12, 10)
    }

    /// Short month for billing-day clamping
    pub fn february_leap() -> NaiveDate {
        Self::ymd(2024, 2, 10)
    }

    pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("fixture date is valid")
    }
}

/// Fixture for loans
pub struct LoanFixtures;

impl LoanFixtures {
    /// Car loan, 100,000 at 12% with a 10,000 EMI billed on the 5th
    pub fn car_loan() -> Loan {
        Loan {
            id: LoanId::from_raw("car-loan"),
            name: "Car loan".to_string(),
            lender: "HDFC".to_string(),
            remaining_amount: dec!(100000),
            interest_rate: dec!(12),
            emi_amount: dec!(10000),
            due_date: Some(DateFixtures::ymd(2025, 1, 5)),
            emi_day_of_month: Some(5),
            last_emi_paid_date: None,
            total_emis: Some(10),
            emis_paid_count: 0,
            total_interest_paid: dec!(0),
        }
    }

    /// Personal loan with no known EMI count, billed on the 20th
    pub fn personal_loan() -> Loan {
        Loan {
            id: LoanId::from_raw("personal-loan"),
            name: "Personal loan".to_string(),
            lender: "SBI".to_string(),
            remaining_amount: dec!(50000),
            interest_rate: dec!(14.5),
            emi_amount: dec!(2500),
            due_date: Some(DateFixtures::ymd(2025, 1, 20)),
            emi_day_of_month: Some(20),
            last_emi_paid_date: None,
            total_emis: None,
            emis_paid_count: 0,
            total_interest_paid: dec!(0),
        }
    }

    /// Fully repaid loan
    pub fn completed_loan() -> Loan {
        Loan {
            id: LoanId::from_raw("completed-loan"),
            name: "Phone EMI".to_string(),
            lender: "Bajaj".to_string(),
            remaining_amount: dec!(0),
            interest_rate: dec!(0),
            emi_amount: dec!(1500),
            due_date: Some(DateFixtures::ymd(2024, 6, 3)),
            emi_day_of_month: Some(3),
            last_emi_paid_date: Some(DateFixtures::ymd(2024, 12, 3)),
            total_emis: Some(12),
            emis_paid_count: 12,
            total_interest_paid: dec!(0),
        }
    }

    /// Creation input matching [`LoanFixtures::car_loan`]
    pub fn new_car_loan() -> NewLoan {
        let loan = Self::car_loan();
        NewLoan {
            name: loan.name,
            lender: loan.lender,
            remaining_amount: loan.remaining_amount,
            interest_rate: loan.interest_rate,
            emi_amount: loan.emi_amount,
            due_date: loan.due_date,
            emi_day_of_month: None,
            total_emis: loan.total_emis,
            emis_paid_count: None,
        }
    }
}

/// Fixture for PnL snapshots
pub struct PnlFixtures;

impl PnlFixtures {
    pub fn baseline() -> rust_decimal::Decimal {
        dec!(100000)
    }

    /// Three snapshots in January 2025, out of date order
    pub fn january_entries() -> Vec<PnlEntry> {
        vec![
            PnlEntry::new(DateFixtures::ymd(2025, 1, 3), dec!(98000)),
            PnlEntry::new(DateFixtures::ymd(2025, 1, 1), dec!(95000)),
            PnlEntry::new(DateFixtures::ymd(2025, 1, 10), dec!(103500)),
        ]
    }
}
