//! Handler for whole-dataset regeneration of the synthetic ledger.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use gridpulse_core::corpus::{build_corpus, CorpusConfig};
use gridpulse_db::repositories::WorkloadRecordRepo;
use gridpulse_db::seed::{seed_corpus, SeedReport};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Upper bound on the requested history depth.
pub const MAX_SEED_DAYS: u32 = 365;

/// Request body for `POST /seed`.
#[derive(Debug, Deserialize)]
pub struct SeedRequest {
    pub day_count: u32,
    pub owner_ids: Vec<String>,
    pub zone_ids: Vec<String>,
    /// Omit for a random seed. Supplying one makes the regeneration
    /// reproducible.
    pub seed: Option<u64>,
}

/// Payload of `POST /seed`: the seed actually used plus the delivery
/// report.
#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub seed: u64,
    #[serde(flatten)]
    pub report: SeedReport,
}

// ---------------------------------------------------------------------------
// POST /seed -- regenerate the ledger
// ---------------------------------------------------------------------------

/// Replace the ledger with a freshly synthesized corpus.
///
/// The corpus is built before anything is deleted, so a precondition
/// failure (empty owners/zones) leaves the existing data untouched.
pub async fn reseed(
    State(state): State<AppState>,
    Json(body): Json<SeedRequest>,
) -> AppResult<impl IntoResponse> {
    if body.day_count == 0 || body.day_count > MAX_SEED_DAYS {
        return Err(AppError::BadRequest(format!(
            "day_count must be between 1 and {MAX_SEED_DAYS}"
        )));
    }

    let seed = body.seed.unwrap_or_else(|| rand::rng().random());
    let config = CorpusConfig {
        day_count: body.day_count,
        owner_ids: body.owner_ids,
        zone_ids: body.zone_ids,
    };

    // CoreError auto-converts to AppError via #[from].
    let records = build_corpus(&config, Utc::now(), seed)?;

    let deleted = WorkloadRecordRepo::delete_all(&state.pool).await?;
    tracing::info!(deleted, generated = records.len(), seed, "Regenerating ledger");

    let report = seed_corpus(&state.pool, &records).await;
    Ok(Json(DataResponse {
        data: SeedResponse { seed, report },
    }))
}
