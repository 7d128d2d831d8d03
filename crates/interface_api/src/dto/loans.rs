//! Loan DTOs

use domain_loans::{EmiStats, Loan, LoanForm};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{number_or_text, optional_number_or_text};

/// Body of `POST /loans`
///
/// Amounts may be sent as JSON numbers or as the text typed into the form.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoanRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 1, max = 120))]
    pub lender: String,
    #[serde(deserialize_with = "number_or_text")]
    pub remaining_amount: String,
    #[serde(deserialize_with = "number_or_text")]
    pub interest_rate: String,
    #[serde(deserialize_with = "number_or_text")]
    pub emi_amount: String,
    #[validate(length(equal = 10))]
    pub due_date: String,
    #[serde(default, deserialize_with = "optional_number_or_text")]
    pub total_emis: String,
}

impl From<CreateLoanRequest> for LoanForm {
    fn from(request: CreateLoanRequest) -> Self {
        LoanForm {
            name: request.name,
            lender: request.lender,
            remaining_amount: request.remaining_amount,
            interest_rate: request.interest_rate,
            emi_amount: request.emi_amount,
            due_date: request.due_date,
            total_emis: request.total_emis,
        }
    }
}

/// Body of `POST /loans/:id/payments`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Payment date; today when absent
    #[serde(default)]
    pub date: Option<String>,
}

/// A loan with its progress figures
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanView {
    #[serde(flatten)]
    pub loan: Loan,
    pub stats: EmiStats,
}

impl From<&Loan> for LoanView {
    fn from(loan: &Loan) -> Self {
        LoanView {
            stats: domain_loans::get_emi_stats(Some(loan)),
            loan: loan.clone(),
        }
    }
}

/// Body of `GET /loans`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoansResponse {
    pub loans: Vec<LoanView>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_liability: Decimal,
    /// Total liability as shown on the dashboard, e.g. `₹ 1,23,457`
    pub total_liability_display: String,
    pub loading: bool,
}
