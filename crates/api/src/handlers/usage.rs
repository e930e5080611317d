//! Handler for aggregated usage queries.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{NaiveDate, Utc};
use gridpulse_core::aggregation::{aggregate, Granularity};
use gridpulse_db::repositories::{RecordScope, WorkloadRecordRepo};
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

use super::{history_start, into_records, window_bounds};

/// Query parameters for the usage endpoint.
#[derive(Debug, Deserialize)]
pub struct UsageQuery {
    pub granularity: Option<Granularity>,
    /// First day of the window (inclusive). Defaults to the granularity's
    /// history window ending at `to`.
    pub from: Option<NaiveDate>,
    /// Last day of the window (inclusive). Defaults to today.
    pub to: Option<NaiveDate>,
    pub owner_id: Option<String>,
    pub zone_id: Option<String>,
}

// ---------------------------------------------------------------------------
// GET /usage -- aggregated buckets over a calendar window
// ---------------------------------------------------------------------------

/// Aggregate the ledger into zero-filled calendar buckets.
///
/// An empty ledger returns a full window of zero buckets, not an error --
/// the dashboard renders that as "no data yet".
pub async fn usage(
    State(state): State<AppState>,
    Query(params): Query<UsageQuery>,
) -> AppResult<impl IntoResponse> {
    let granularity = params.granularity.unwrap_or(Granularity::Day);
    let to = params.to.unwrap_or_else(|| Utc::now().date_naive());
    let from = params
        .from
        .unwrap_or_else(|| history_start(to, granularity.default_history_days()));
    let (window_start, window_end) = window_bounds(from, to);

    let scope = RecordScope {
        owner_id: params.owner_id,
        zone_id: params.zone_id,
    };
    let rows =
        WorkloadRecordRepo::list_in_window(&state.pool, window_start, window_end, &scope).await?;
    let records = into_records(rows);

    let buckets = aggregate(&records, granularity, window_start, window_end);
    Ok(Json(DataResponse { data: buckets }))
}
