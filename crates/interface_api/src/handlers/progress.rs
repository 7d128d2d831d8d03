//! Monthly progress handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use core_kernel::{parse_amount, MonthKey};
use domain_loans::progress_percent;

use crate::dto::progress::*;
use crate::{error::ApiError, AppState};

/// Progress stored for a `YYYY-MM` month, 0 when nothing is stored
pub async fn get_progress(
    State(state): State<AppState>,
    Path(month): Path<String>,
    Query(query): Query<ProgressQuery>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let month: MonthKey = month.parse()?;
    let progress = state.progress.get(month).await;

    let percent = match query.target.as_deref().map(str::trim) {
        Some(target) if !target.is_empty() => {
            Some(progress_percent(progress, parse_amount(target)?))
        }
        _ => None,
    };

    Ok(Json(ProgressResponse {
        month,
        progress,
        percent,
    }))
}

/// Adds a signed delta; the stored value never drops below zero
pub async fn apply_delta(
    State(state): State<AppState>,
    Path(month): Path<String>,
    Json(request): Json<ProgressDeltaRequest>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let month: MonthKey = month.parse()?;
    let progress = state.progress.apply_delta(month, request.delta).await;
    Ok(Json(ProgressResponse {
        month,
        progress,
        percent: None,
    }))
}
