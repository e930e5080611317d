//! Handlers for the forecast query interface consumed by the dashboard.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use gridpulse_core::aggregation::{aggregate, AggregatedBucket, Granularity, Metric};
use gridpulse_core::charts::chart_rows;
use gridpulse_core::forecast::{forecast, ForecastPoint};
use gridpulse_core::summary::ForecastSummary;
use gridpulse_core::workload::WorkloadRecord;
use gridpulse_db::repositories::{RecordScope, WorkloadRecordRepo};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

use super::{history_start, into_records, window_bounds};

/// Upper bound on requested forecast horizons.
pub const MAX_PERIODS_AHEAD: u32 = 90;

/// Upper bound on requested history depth, days.
pub const MAX_HISTORY_DAYS: u32 = 730;

/// Query parameters shared by the forecast endpoints.
#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub granularity: Option<Granularity>,
    /// Days of history to aggregate before projecting. Defaults per
    /// granularity, capped at [`MAX_HISTORY_DAYS`].
    pub historical_window_days: Option<u32>,
    /// Future periods to project. Defaults per granularity, capped at
    /// [`MAX_PERIODS_AHEAD`].
    pub periods_ahead: Option<u32>,
    /// Chart metric (chart endpoint only). Defaults to energy.
    pub metric: Option<Metric>,
    pub owner_id: Option<String>,
    pub zone_id: Option<String>,
}

/// Per-metric forecast series.
#[derive(Debug, Serialize)]
pub struct MetricSeries {
    pub energy: Vec<ForecastPoint>,
    pub cost: Vec<ForecastPoint>,
    pub carbon: Vec<ForecastPoint>,
}

/// Payload of `GET /forecast`.
#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub aggregated_historical: Vec<AggregatedBucket>,
    pub forecasts: MetricSeries,
    pub summary: ForecastSummary,
}

/// Fetch the scoped history window and aggregate it.
async fn load_buckets(
    state: &AppState,
    params: &ForecastQuery,
) -> AppResult<(Vec<AggregatedBucket>, Granularity, u32)> {
    let granularity = params.granularity.unwrap_or(Granularity::Day);
    let periods_ahead = params
        .periods_ahead
        .unwrap_or_else(|| granularity.default_periods_ahead())
        .min(MAX_PERIODS_AHEAD);
    let history_days = params
        .historical_window_days
        .unwrap_or_else(|| granularity.default_history_days())
        .min(MAX_HISTORY_DAYS);

    let to = Utc::now().date_naive();
    let from = history_start(to, history_days);
    let (window_start, window_end) = window_bounds(from, to);

    let scope = RecordScope {
        owner_id: params.owner_id.clone(),
        zone_id: params.zone_id.clone(),
    };
    let rows =
        WorkloadRecordRepo::list_in_window(&state.pool, window_start, window_end, &scope).await?;
    let records: Vec<WorkloadRecord> = into_records(rows);

    let buckets = aggregate(&records, granularity, window_start, window_end);
    Ok((buckets, granularity, periods_ahead))
}

// ---------------------------------------------------------------------------
// GET /forecast -- three-metric projection with summary
// ---------------------------------------------------------------------------

/// Project all three metrics forward and attach the scalar summary.
pub async fn forecast_query(
    State(state): State<AppState>,
    Query(params): Query<ForecastQuery>,
) -> AppResult<impl IntoResponse> {
    let (buckets, granularity, periods_ahead) = load_buckets(&state, &params).await?;

    let energy = forecast(&buckets, periods_ahead, Metric::Energy, granularity);
    let cost = forecast(&buckets, periods_ahead, Metric::Cost, granularity);
    let carbon = forecast(&buckets, periods_ahead, Metric::Carbon, granularity);
    let summary = ForecastSummary::from_series(&energy, &cost, &carbon);

    Ok(Json(DataResponse {
        data: ForecastResponse {
            aggregated_historical: buckets,
            forecasts: MetricSeries { energy, cost, carbon },
            summary,
        },
    }))
}

// ---------------------------------------------------------------------------
// GET /forecast/chart -- merged rows for one metric
// ---------------------------------------------------------------------------

/// One row per period across the combined historical + projected window,
/// ready for the dashboard chart.
pub async fn forecast_chart(
    State(state): State<AppState>,
    Query(params): Query<ForecastQuery>,
) -> AppResult<impl IntoResponse> {
    let metric = params.metric.unwrap_or(Metric::Energy);
    let (buckets, granularity, periods_ahead) = load_buckets(&state, &params).await?;

    let points = forecast(&buckets, periods_ahead, metric, granularity);
    let rows = chart_rows(&buckets, &points, metric);

    Ok(Json(DataResponse { data: rows }))
}
