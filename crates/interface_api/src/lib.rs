//! HTTP API Layer
//!
//! This crate exposes the loan ledger, the monthly progress tracker and the
//! recovery ledger to the local UI over a small JSON API built on Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for each ledger
//! - **Middleware**: Request ids and request logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! Each ledger sits behind its own `tokio::sync::Mutex`, so requests against
//! one ledger are applied strictly one after another.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::load(store, &config).await;
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    http::HeaderName,
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use chrono::NaiveDate;
use core_kernel::{KeyValueStore, Timezone};
use domain_loans::{LoanLedger, LoanStorageKeys, ProgressTracker, ScheduleConfig};
use domain_pnl::PnlLedger;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{health, loans, pnl, progress};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub loans: Arc<Mutex<LoanLedger>>,
    pub pnl: Arc<Mutex<PnlLedger>>,
    pub progress: Arc<ProgressTracker>,
    pub store: Arc<dyn KeyValueStore>,
    pub schedule: ScheduleConfig,
    pub timezone: Timezone,
    /// Pins "today", for reproducible dashboards
    pub fixed_today: Option<NaiveDate>,
}

impl AppState {
    /// Builds the state with both ledgers still loading
    pub fn new(store: Arc<dyn KeyValueStore>, config: &ApiConfig) -> Self {
        let keys = LoanStorageKeys::default();
        Self {
            loans: Arc::new(Mutex::new(LoanLedger::new(store.clone(), keys.clone()))),
            pnl: Arc::new(Mutex::new(PnlLedger::new(store.clone(), config.pnl_config()))),
            progress: Arc::new(ProgressTracker::new(store.clone(), &keys)),
            store,
            schedule: config.schedule_config(),
            timezone: config.timezone,
            fixed_today: None,
        }
    }

    /// Builds the state and hydrates both ledgers
    pub async fn load(store: Arc<dyn KeyValueStore>, config: &ApiConfig) -> Self {
        let state = Self::new(store, config);
        state.hydrate().await;
        state
    }

    /// Reads both ledgers from the store
    pub async fn hydrate(&self) {
        self.loans.lock().await.hydrate().await;
        self.pnl.lock().await.hydrate().await;
    }

    pub fn with_fixed_today(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    /// Today's date in the configured timezone
    pub fn today(&self) -> NaiveDate {
        self.fixed_today.unwrap_or_else(|| self.timezone.today())
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Ledgers, store and dashboard settings
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let loan_routes = Router::new()
        .route("/", get(loans::list_loans).post(loans::create_loan))
        .route("/upcoming", get(loans::upcoming))
        .route("/paid", get(loans::paid))
        .route("/horizon", get(loans::horizon))
        .route("/planner", get(loans::planner))
        .route(
            "/:id",
            get(loans::get_loan)
                .patch(loans::update_loan)
                .delete(loans::delete_loan),
        )
        .route("/:id/payments", post(loans::record_payment))
        .route("/:id/stats", get(loans::loan_stats));

    let progress_routes = Router::new().route(
        "/:month",
        get(progress::get_progress).post(progress::apply_delta),
    );

    let pnl_routes = Router::new()
        .route("/", get(pnl::overview))
        .route("/baseline", post(pnl::save_baseline))
        .route("/entries", get(pnl::list_entries).post(pnl::save_entry))
        .route(
            "/entries/:id",
            patch(pnl::edit_entry).delete(pnl::delete_entry),
        )
        .route("/reset", post(pnl::reset))
        .route("/series", get(pnl::series));

    let api_routes = Router::new()
        .merge(public_routes)
        .nest("/loans", loan_routes)
        .nest("/progress", progress_routes)
        .nest("/pnl", pnl_routes);

    let request_id = HeaderName::from_static(middleware::REQUEST_ID_HEADER);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(axum_middleware::from_fn(middleware::request_logging))
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
