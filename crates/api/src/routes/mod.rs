pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /usage              aggregated usage buckets (zero-filled window)
/// /forecast           historical + projected series per metric, with summary
/// /forecast/chart     merged chart rows for one metric
/// /seed               regenerate the synthetic ledger (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/usage", get(handlers::usage::usage))
        .route("/forecast", get(handlers::forecast::forecast_query))
        .route("/forecast/chart", get(handlers::forecast::forecast_chart))
        .route("/seed", post(handlers::seed::reseed))
}
