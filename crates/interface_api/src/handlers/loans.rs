//! Loan handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use core_kernel::{format_inr, LoanId};
use domain_loans::{
    debt_free_horizon, get_emi_stats, paid_this_month, plan_month, upcoming_emis,
    DebtFreeHorizon, EmiStats, LoanForm, LoanPatch, MonthlyPlan, PaidThisMonth, PaymentOutcome,
    UpcomingEmi,
};

use crate::dto::loans::*;
use crate::dto::validated;
use crate::{error::ApiError, AppState};

/// Lists loans with their progress and the total liability
pub async fn list_loans(State(state): State<AppState>) -> Json<LoansResponse> {
    let ledger = state.loans.lock().await;
    let total_liability = ledger.total_liability();
    Json(LoansResponse {
        loans: ledger.loans().iter().map(LoanView::from).collect(),
        total_liability,
        total_liability_display: format_inr(total_liability),
        loading: ledger.is_loading(),
    })
}

/// Adds a loan from the form values
pub async fn create_loan(
    State(state): State<AppState>,
    Json(request): Json<CreateLoanRequest>,
) -> Result<(StatusCode, Json<LoanView>), ApiError> {
    let form = LoanForm::from(validated(request)?);
    let new_loan = form.to_new_loan()?;
    let loan = state.loans.lock().await.add_loan(new_loan).await?;
    Ok((StatusCode::CREATED, Json(LoanView::from(&loan))))
}

/// Gets a loan by ID
pub async fn get_loan(
    State(state): State<AppState>,
    Path(id): Path<LoanId>,
) -> Result<Json<LoanView>, ApiError> {
    let ledger = state.loans.lock().await;
    ledger
        .get(&id)
        .map(|loan| Json(LoanView::from(loan)))
        .ok_or_else(|| ApiError::NotFound(format!("Loan {id} not found")))
}

/// Applies an allow-listed patch; unknown ids are a silent no-op
pub async fn update_loan(
    State(state): State<AppState>,
    Path(id): Path<LoanId>,
    Json(patch): Json<LoanPatch>,
) -> Result<Response, ApiError> {
    let mut ledger = state.loans.lock().await;
    if !ledger.update_loan(&id, patch).await? {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(match ledger.get(&id) {
        Some(loan) => Json(LoanView::from(loan)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// Deletes a loan; unknown ids are a silent no-op
pub async fn delete_loan(
    State(state): State<AppState>,
    Path(id): Path<LoanId>,
) -> Result<StatusCode, ApiError> {
    state.loans.lock().await.delete_loan(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Records this month's EMI
///
/// Answers with the payment outcome; an unknown id answers 204.
pub async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<LoanId>,
    body: Option<Json<PaymentRequest>>,
) -> Result<Response, ApiError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let date = request
        .date
        .unwrap_or_else(|| state.today().format("%Y-%m-%d").to_string());

    let outcome = state.loans.lock().await.mark_emi_paid(&id, &date).await?;
    Ok(match outcome {
        PaymentOutcome::NotFound => StatusCode::NO_CONTENT.into_response(),
        outcome => Json(outcome).into_response(),
    })
}

/// EMI progress of one loan
pub async fn loan_stats(
    State(state): State<AppState>,
    Path(id): Path<LoanId>,
) -> Result<Json<EmiStats>, ApiError> {
    let ledger = state.loans.lock().await;
    let loan = ledger
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(format!("Loan {id} not found")))?;
    Ok(Json(get_emi_stats(Some(loan))))
}

/// Next EMIs across all open loans
pub async fn upcoming(State(state): State<AppState>) -> Json<Vec<UpcomingEmi>> {
    let ledger = state.loans.lock().await;
    Json(upcoming_emis(
        ledger.loans(),
        state.today(),
        state.schedule.upcoming_limit,
    ))
}

/// EMIs paid in the current month
pub async fn paid(State(state): State<AppState>) -> Json<PaidThisMonth> {
    let ledger = state.loans.lock().await;
    Json(paid_this_month(
        ledger.loans(),
        state.today(),
        state.schedule.paid_limit,
    ))
}

/// Month in which the last known EMI schedule ends, `null` if none
pub async fn horizon(State(state): State<AppState>) -> Json<Option<DebtFreeHorizon>> {
    let ledger = state.loans.lock().await;
    Json(debt_free_horizon(ledger.loans(), state.today()))
}

/// Cash needed this month and over the look-ahead window
pub async fn planner(State(state): State<AppState>) -> Json<MonthlyPlan> {
    let ledger = state.loans.lock().await;
    Json(plan_month(
        ledger.loans(),
        state.today(),
        state.schedule.planner_window_days,
    ))
}
