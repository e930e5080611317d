//! Batch delivery of a synthesized corpus into the ledger.

use gridpulse_core::workload::WorkloadRecord;
use serde::Serialize;

use crate::repositories::WorkloadRecordRepo;
use crate::DbPool;

/// Records per INSERT batch.
pub const SEED_BATCH_SIZE: usize = 100;

/// Outcome of a corpus delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub inserted: u64,
    pub total: u64,
    pub failed_batches: u32,
}

/// Stream `records` into the ledger in batches of [`SEED_BATCH_SIZE`].
///
/// A failed batch is logged and skipped; earlier batches are never
/// rolled back. The report carries inserted vs. total so callers can
/// surface partial delivery.
pub async fn seed_corpus(pool: &DbPool, records: &[WorkloadRecord]) -> SeedReport {
    let mut inserted: u64 = 0;
    let mut failed_batches: u32 = 0;

    for (batch_index, batch) in records.chunks(SEED_BATCH_SIZE).enumerate() {
        match WorkloadRecordRepo::insert_batch(pool, batch).await {
            Ok(count) => inserted += count,
            Err(e) => {
                failed_batches += 1;
                tracing::error!(
                    error = %e,
                    batch_index,
                    batch_len = batch.len(),
                    "Batch insert failed, continuing with next batch"
                );
            }
        }
    }

    let report = SeedReport {
        inserted,
        total: records.len() as u64,
        failed_batches,
    };
    tracing::info!(
        inserted = report.inserted,
        total = report.total,
        failed_batches = report.failed_batches,
        "Corpus delivery complete"
    );
    report
}
