//! Loan ledger
//!
//! Owns the loan collection, applies the payment rules and writes the whole
//! collection back to the store after every change.

use std::sync::Arc;

use core_kernel::{normalize_date, same_month, sum_amounts, KeyValueStore, KeyValueStoreExt, LoanId};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::amortization::{installments_needed, split_installment, InstallmentBreakdown};
use crate::config::LoanStorageKeys;
use crate::error::LoanError;
use crate::loan::{validate_emi_day, Loan, LoanPatch, NewLoan};

/// Result of a payment request
///
/// Only `Applied` changes the ledger; every other variant is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PaymentOutcome {
    Applied(InstallmentBreakdown),
    /// A payment is already recorded for this calendar month
    AlreadyPaidThisMonth,
    /// The loan has no positive EMI amount
    NoEmiConfigured,
    /// Nothing is left to repay
    LoanClosed,
    NotFound,
}

impl PaymentOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, PaymentOutcome::Applied(_))
    }
}

/// The loan ledger
///
/// # Lifecycle
///
/// A ledger starts in the loading state. [`LoanLedger::hydrate`] reads the
/// stored collection and always ends loading, even if the store failed.
/// Mutations before that return [`LoanError::NotReady`].
///
/// # Persistence
///
/// Memory is updated first, then the full collection is saved. A failed save
/// is logged and memory stays authoritative.
pub struct LoanLedger {
    store: Arc<dyn KeyValueStore>,
    keys: LoanStorageKeys,
    loans: Vec<Loan>,
    loading: bool,
}

impl LoanLedger {
    /// Creates a ledger in the loading state
    pub fn new(store: Arc<dyn KeyValueStore>, keys: LoanStorageKeys) -> Self {
        Self {
            store,
            keys,
            loans: Vec::new(),
            loading: true,
        }
    }

    /// Creates a ledger and hydrates it from the store
    pub async fn load(store: Arc<dyn KeyValueStore>, keys: LoanStorageKeys) -> Self {
        let mut ledger = Self::new(store, keys);
        ledger.hydrate().await;
        ledger
    }

    /// Reads the stored collection, dropping records that cannot be decoded
    pub async fn hydrate(&mut self) {
        self.loans = match self.store.load_json::<serde_json::Value>(&self.keys.loans).await {
            Ok(Some(serde_json::Value::Array(records))) => decode_records(records),
            Ok(Some(other)) => {
                warn!(key = %self.keys.loans, kind = json_kind(&other), "Stored loans are not a list, starting empty");
                Vec::new()
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key = %self.keys.loans, error = %e, "Failed to load loans");
                Vec::new()
            }
        };
        self.loading = false;
        info!(count = self.loans.len(), "Loan ledger hydrated");
    }

    /// True until hydration has finished
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Loans in insertion order
    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    pub fn get(&self, id: &LoanId) -> Option<&Loan> {
        self.loans.iter().find(|loan| &loan.id == id)
    }

    /// Sum of outstanding balances, saturating at `Decimal::MAX`
    pub fn total_liability(&self) -> Decimal {
        sum_amounts(self.loans.iter().map(|loan| loan.remaining_amount))
    }

    /// Adds a loan and returns the stored record
    ///
    /// Negative balance or EMI amounts are raised to zero. The EMI count is
    /// derived when absent, and the billing day is taken from the due date
    /// when not given.
    ///
    /// # Errors
    ///
    /// Returns `LoanError::OutOfRange` when the EMI count has to be derived
    /// but the balance divided by the EMI does not fit in a `u32`.
    pub async fn add_loan(&mut self, new_loan: NewLoan) -> Result<Loan, LoanError> {
        self.ensure_ready("add_loan")?;
        if let Some(day) = new_loan.emi_day_of_month {
            validate_emi_day(day)?;
        }

        let remaining_amount = new_loan.remaining_amount.max(Decimal::ZERO);
        let emi_amount = new_loan.emi_amount.max(Decimal::ZERO);
        let total_emis = match new_loan.total_emis {
            Some(total) => Some(total),
            None if remaining_amount > Decimal::ZERO && emi_amount > Decimal::ZERO => {
                let derived = installments_needed(remaining_amount, emi_amount);
                if derived.is_none() {
                    warn!(%remaining_amount, %emi_amount, "Rejected loan with an uncountable EMI schedule");
                    return Err(LoanError::OutOfRange("EMI amount"));
                }
                derived
            }
            None => None,
        };
        let emi_day_of_month = new_loan
            .emi_day_of_month
            .or_else(|| new_loan.due_date.map(|d| chrono::Datelike::day(&d)));

        let loan = Loan {
            id: LoanId::new_v7(),
            name: new_loan.name,
            lender: new_loan.lender,
            remaining_amount,
            interest_rate: new_loan.interest_rate,
            emi_amount,
            due_date: new_loan.due_date,
            emi_day_of_month,
            last_emi_paid_date: None,
            total_emis,
            emis_paid_count: new_loan.emis_paid_count.unwrap_or(0),
            total_interest_paid: Decimal::ZERO,
        };

        info!(loan_id = %loan.id, total_emis = ?loan.total_emis, "Loan added");
        self.loans.push(loan.clone());
        self.persist().await;
        Ok(loan)
    }

    /// Merges `patch` into the loan; returns false if the id is unknown
    ///
    /// Derived fields are not recomputed.
    pub async fn update_loan(&mut self, id: &LoanId, patch: LoanPatch) -> Result<bool, LoanError> {
        self.ensure_ready("update_loan")?;
        patch.validate()?;

        let Some(loan) = self.loans.iter_mut().find(|loan| &loan.id == id) else {
            debug!(loan_id = %id, "Update for unknown loan ignored");
            return Ok(false);
        };
        patch.apply_to(loan);

        info!(loan_id = %id, "Loan updated");
        self.persist().await;
        Ok(true)
    }

    /// Removes the loan; returns false if the id is unknown
    pub async fn delete_loan(&mut self, id: &LoanId) -> Result<bool, LoanError> {
        self.ensure_ready("delete_loan")?;

        let before = self.loans.len();
        self.loans.retain(|loan| &loan.id != id);
        if self.loans.len() == before {
            debug!(loan_id = %id, "Delete for unknown loan ignored");
            return Ok(false);
        }

        info!(loan_id = %id, "Loan deleted");
        self.persist().await;
        Ok(true)
    }

    /// Records the EMI for the calendar month of `date`
    ///
    /// At most one payment is applied per loan and calendar month. The EMI
    /// first covers the month's interest; the rest repays principal.
    ///
    /// # Errors
    ///
    /// Returns `LoanError::InvalidDate` if `date` cannot be read,
    /// `LoanError::OutOfRange` if the installment cannot be calculated within
    /// the range of `Decimal` (or the paid count is exhausted), and
    /// `LoanError::NotReady` while loading. The ledger is unchanged in all
    /// of these cases.
    pub async fn mark_emi_paid(&mut self, id: &LoanId, date: &str) -> Result<PaymentOutcome, LoanError> {
        self.ensure_ready("mark_emi_paid")?;
        let paid_on = normalize_date(date).map_err(|e| {
            warn!(loan_id = %id, date, error = %e, "Rejected payment with unreadable date");
            LoanError::date("payment date", e)
        })?;

        let Some(loan) = self.loans.iter_mut().find(|loan| &loan.id == id) else {
            return Ok(PaymentOutcome::NotFound);
        };
        if loan.emi_amount <= Decimal::ZERO {
            return Ok(PaymentOutcome::NoEmiConfigured);
        }
        if loan.remaining_amount <= Decimal::ZERO {
            return Ok(PaymentOutcome::LoanClosed);
        }
        if loan
            .last_emi_paid_date
            .is_some_and(|last| same_month(last, paid_on))
        {
            debug!(loan_id = %id, %paid_on, "EMI already paid this month");
            return Ok(PaymentOutcome::AlreadyPaidThisMonth);
        }

        let applied = split_installment(loan.remaining_amount, loan.interest_rate, loan.emi_amount)
            .and_then(|split| {
                let paid_count = loan.emis_paid_count.checked_add(1)?;
                let interest_paid = loan.total_interest_paid.checked_add(split.interest)?;
                Some((split, paid_count, interest_paid))
            });
        let Some((split, paid_count, interest_paid)) = applied else {
            warn!(loan_id = %id, balance = %loan.remaining_amount, "Payment amounts out of range, ledger unchanged");
            return Err(LoanError::OutOfRange("EMI payment"));
        };

        loan.last_emi_paid_date = Some(paid_on);
        loan.emis_paid_count = paid_count;
        loan.total_interest_paid = interest_paid;
        loan.remaining_amount = split.new_balance;

        info!(
            loan_id = %id,
            %paid_on,
            interest = %split.interest,
            principal = %split.principal,
            balance = %split.new_balance,
            "EMI payment applied"
        );
        self.persist().await;
        Ok(PaymentOutcome::Applied(split))
    }

    fn ensure_ready(&self, operation: &'static str) -> Result<(), LoanError> {
        if self.loading {
            warn!(operation, "Loan ledger mutation suppressed while loading");
            return Err(LoanError::NotReady);
        }
        Ok(())
    }

    async fn persist(&self) {
        if let Err(e) = self.store.save_json(&self.keys.loans, &self.loans).await {
            warn!(key = %self.keys.loans, error = %e, "Failed to save loans");
        }
    }
}

fn decode_records(records: Vec<serde_json::Value>) -> Vec<Loan> {
    let total = records.len();
    let loans: Vec<Loan> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Loan>(record) {
            Ok(loan) => Some(loan),
            Err(e) => {
                warn!(index, error = %e, "Dropping malformed loan record");
                None
            }
        })
        .collect();
    if loans.len() < total {
        warn!(dropped = total - loans.len(), "Some stored loans could not be read");
    }
    loans
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
