//! Loan Domain - EMI Ledger
//!
//! This crate tracks personal loans repaid through fixed monthly installments
//! (EMIs) on a reducing balance.
//!
//! # Payment rules
//!
//! - Interest for a cycle is `balance * rate / 12 / 100`
//! - The EMI covers interest first; the remainder repays principal
//! - At most one payment is applied per loan and calendar month
//! - Balances never go below zero and only decrease through payments
//!
//! # Components
//!
//! - [`LoanLedger`]: the owned collection with its load/persist lifecycle
//! - [`get_emi_stats`]: progress figures for one loan
//! - [`schedule`]: upcoming and paid EMIs, debt-free horizon
//! - [`planner`]: monthly outflow and look-ahead window
//! - [`ProgressTracker`]: manual per-month progress values
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_loans::{LoanLedger, LoanStorageKeys, LoanForm};
//!
//! let mut ledger = LoanLedger::load(store, LoanStorageKeys::default()).await;
//! let loan = ledger.add_loan(form.to_new_loan()?).await?;
//! let outcome = ledger.mark_emi_paid(&loan.id, "2025-01-05").await?;
//! ```

pub mod amortization;
pub mod config;
pub mod error;
pub mod ledger;
pub mod loan;
pub mod planner;
pub mod progress;
pub mod schedule;
pub mod stats;

pub use amortization::InstallmentBreakdown;
pub use config::{LoanStorageKeys, ScheduleConfig};
pub use error::LoanError;
pub use ledger::{LoanLedger, PaymentOutcome};
pub use loan::{Loan, LoanForm, LoanPatch, NewLoan};
pub use planner::{plan_month, progress_percent, MonthlyPlan};
pub use progress::ProgressTracker;
pub use schedule::{
    debt_free_horizon, next_emi_date, paid_this_month, upcoming_emis, DebtFreeHorizon, PaidEmi,
    PaidThisMonth, UpcomingEmi,
};
pub use stats::{get_emi_stats, EmiStats};
