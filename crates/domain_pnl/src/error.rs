//! PnL domain errors

use core_kernel::{MoneyError, TemporalError};
use thiserror::Error;

/// Errors that can occur in the PnL domain
#[derive(Debug, Error, PartialEq)]
pub enum PnlError {
    /// Entry date is malformed or not a calendar date
    #[error("Invalid date: {0}")]
    InvalidDate(#[from] TemporalError),

    /// Capital text is not a finite number
    #[error("Invalid capital: {0}")]
    InvalidCapital(#[from] MoneyError),

    /// Entries cannot change before a baseline is saved
    #[error("Save your starting capital before adding entries")]
    BaselineRequired,

    /// The baseline is set once; reset the ledger to change it
    #[error("Baseline already saved; reset the ledger to change it")]
    BaselineAlreadySaved,

    /// Unknown aggregation mode
    #[error("Unknown view mode: {0}")]
    InvalidViewMode(String),

    /// Mutation attempted while the ledger is still hydrating
    #[error("PnL ledger is still loading")]
    NotReady,
}

impl PnlError {
    /// Returns true if the error was caused by user input
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PnlError::InvalidDate(_) | PnlError::InvalidCapital(_) | PnlError::InvalidViewMode(_)
        )
    }
}
