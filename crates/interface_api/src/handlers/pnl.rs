//! PnL handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use core_kernel::parse_iso_date;
use domain_pnl::{
    parse_capital, ChartSeries, EntriesPage, EntryForm, EntryView, PnlEntry, ViewMode,
};

use crate::dto::pnl::*;
use crate::dto::validated;
use crate::{error::ApiError, AppState};

/// Ledger state and headline figures
pub async fn overview(State(state): State<AppState>) -> Json<PnlOverview> {
    let ledger = state.pnl.lock().await;
    Json(PnlOverview::from(&*ledger))
}

/// Saves the starting capital once
pub async fn save_baseline(
    State(state): State<AppState>,
    Json(request): Json<BaselineRequest>,
) -> Result<Json<PnlOverview>, ApiError> {
    let capital = parse_capital(&request.capital)?;
    let mut ledger = state.pnl.lock().await;
    ledger.save_baseline(capital).await?;
    Ok(Json(PnlOverview::from(&*ledger)))
}

/// Records the capital for a date, replacing that date's entry
pub async fn save_entry(
    State(state): State<AppState>,
    Json(request): Json<EntryRequest>,
) -> Result<(StatusCode, Json<EntryView>), ApiError> {
    let form = EntryForm {
        date: request.date,
        capital: request.capital,
    };
    let (date, capital) = form.parse()?;

    let mut ledger = state.pnl.lock().await;
    let entry = ledger.save_entry(date, capital).await?;
    Ok((StatusCode::CREATED, Json(entry_view(&entry, ledger.baseline()))))
}

/// Entries newest first
pub async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<EntriesQuery>,
) -> Result<Json<EntriesPage>, ApiError> {
    let query = validated(query)?;
    let ledger = state.pnl.lock().await;
    Ok(Json(ledger.entries_page(query.offset, query.limit)))
}

/// Replaces the capital of an entry; unknown ids are a silent no-op
pub async fn edit_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<EditEntryRequest>,
) -> Result<Response, ApiError> {
    let id = parse_iso_date(&id)?;
    let capital = parse_capital(&request.capital)?;

    let mut ledger = state.pnl.lock().await;
    if !ledger.edit_entry(id, capital).await? {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(match ledger.get(id) {
        Some(entry) => Json(entry_view(entry, ledger.baseline())).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// Deletes an entry; unknown ids are a silent no-op
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_iso_date(&id)?;
    state.pnl.lock().await.delete_entry(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Clears entries and baseline
pub async fn reset(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.pnl.lock().await.reset_all().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delta series for the chart
///
/// Answers 404 until a baseline is saved, since no delta exists yet.
pub async fn series(
    State(state): State<AppState>,
    Query(query): Query<SeriesQuery>,
) -> Result<Json<ChartSeries>, ApiError> {
    let mode = match query.mode.as_deref() {
        Some(mode) => mode.parse::<ViewMode>()?,
        None => ViewMode::default(),
    };
    let ledger = state.pnl.lock().await;
    ledger
        .series(mode)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No baseline saved yet".to_string()))
}

fn entry_view(entry: &PnlEntry, baseline: Option<rust_decimal::Decimal>) -> EntryView {
    EntryView {
        id: entry.id,
        date: entry.date,
        capital: entry.capital,
        delta: baseline.map(|b| entry.delta(b)),
    }
}
