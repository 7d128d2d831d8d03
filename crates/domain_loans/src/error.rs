//! Loan domain errors

use core_kernel::{MoneyError, TemporalError};
use thiserror::Error;

/// Errors that can occur in the loan domain
///
/// Missing loans and repeated payments are not errors; see
/// [`PaymentOutcome`](crate::PaymentOutcome).
#[derive(Debug, Error, PartialEq)]
pub enum LoanError {
    /// A required form field was left blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// An amount field could not be read
    #[error("Invalid {field}: {source}")]
    InvalidAmount {
        field: &'static str,
        #[source]
        source: MoneyError,
    },

    /// A date field could not be read
    #[error("Invalid {field}: {source}")]
    InvalidDate {
        field: &'static str,
        #[source]
        source: TemporalError,
    },

    /// Total EMI count is not a positive whole number
    #[error("Invalid total EMIs: {0}")]
    InvalidTotalEmis(String),

    /// Billing day outside 1-31
    #[error("Invalid EMI day of month: {0}")]
    InvalidEmiDay(u32),

    /// An amount leaves the range the ledger can calculate with
    #[error("{0} is out of range")]
    OutOfRange(&'static str),

    /// Mutation attempted while the ledger is still hydrating
    #[error("Loan ledger is still loading")]
    NotReady,
}

impl LoanError {
    pub(crate) fn amount(field: &'static str, source: MoneyError) -> Self {
        LoanError::InvalidAmount { field, source }
    }

    pub(crate) fn date(field: &'static str, source: TemporalError) -> Self {
        LoanError::InvalidDate { field, source }
    }

    /// Returns true if the error was caused by user input
    pub fn is_validation(&self) -> bool {
        !matches!(self, LoanError::NotReady)
    }
}
