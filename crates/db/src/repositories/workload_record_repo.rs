//! Repository for the `workload_records` table.

use gridpulse_core::types::Timestamp;
use gridpulse_core::workload::WorkloadRecord;
use sqlx::PgPool;

use crate::models::workload_record::WorkloadRecordRow;

/// Column list for `workload_records` queries; also the INSERT bind order.
const COLUMNS: &str = "\
    id, workload_type, submitted_at, gpu_minutes, cpu_cores, memory_gb, \
    urgency, energy_consumed_kwh, cost, carbon_emitted_kg, \
    actual_start, actual_end, owner_id, zone_id";

/// Binds per record in [`WorkloadRecordRepo::insert_batch`].
const BINDS_PER_RECORD: usize = 14;

/// Optional owner/zone filters applied to ledger reads.
#[derive(Debug, Clone, Default)]
pub struct RecordScope {
    pub owner_id: Option<String>,
    pub zone_id: Option<String>,
}

/// Provides query operations for the synthetic workload ledger.
pub struct WorkloadRecordRepo;

impl WorkloadRecordRepo {
    /// Insert a batch of records with a single multi-row INSERT.
    ///
    /// Returns the number of rows written. The batch is atomic: it either
    /// inserts completely or fails as a unit, which is what lets the
    /// seeding loop skip a bad batch and carry on.
    pub async fn insert_batch(
        pool: &PgPool,
        records: &[WorkloadRecord],
    ) -> Result<u64, sqlx::Error> {
        if records.is_empty() {
            return Ok(0);
        }

        let tuples: Vec<String> = (0..records.len())
            .map(|i| {
                let base = i * BINDS_PER_RECORD;
                let binds: Vec<String> =
                    (1..=BINDS_PER_RECORD).map(|c| format!("${}", base + c)).collect();
                format!("({})", binds.join(", "))
            })
            .collect();
        let query = format!(
            "INSERT INTO workload_records ({COLUMNS}) VALUES {}",
            tuples.join(", ")
        );

        let mut insert = sqlx::query(&query);
        for record in records {
            insert = insert
                .bind(&record.id)
                .bind(record.workload_type.as_str())
                .bind(record.submitted_at)
                .bind(record.gpu_minutes)
                .bind(record.cpu_cores)
                .bind(record.memory_gb)
                .bind(record.urgency.as_str())
                .bind(record.energy_consumed_kwh)
                .bind(record.cost)
                .bind(record.carbon_emitted_kg)
                .bind(record.actual_start)
                .bind(record.actual_end)
                .bind(&record.owner_id)
                .bind(&record.zone_id);
        }

        let result = insert.execute(pool).await?;
        Ok(result.rows_affected())
    }

    /// List rows submitted in `[from, to]`, newest first, optionally
    /// scoped to an owner and/or zone.
    pub async fn list_in_window(
        pool: &PgPool,
        from: Timestamp,
        to: Timestamp,
        scope: &RecordScope,
    ) -> Result<Vec<WorkloadRecordRow>, sqlx::Error> {
        let mut query = format!(
            "SELECT {COLUMNS} FROM workload_records \
             WHERE submitted_at >= $1 AND submitted_at <= $2"
        );
        let mut bind_index = 2;
        if scope.owner_id.is_some() {
            bind_index += 1;
            query.push_str(&format!(" AND owner_id = ${bind_index}"));
        }
        if scope.zone_id.is_some() {
            bind_index += 1;
            query.push_str(&format!(" AND zone_id = ${bind_index}"));
        }
        query.push_str(" ORDER BY submitted_at DESC");

        let mut select = sqlx::query_as::<_, WorkloadRecordRow>(&query).bind(from).bind(to);
        if let Some(owner_id) = &scope.owner_id {
            select = select.bind(owner_id);
        }
        if let Some(zone_id) = &scope.zone_id {
            select = select.bind(zone_id);
        }
        select.fetch_all(pool).await
    }

    /// Delete the whole ledger. Regeneration is the only destructive
    /// operation the system performs.
    pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workload_records").execute(pool).await?;
        Ok(result.rows_affected())
    }

    /// Total rows in the ledger.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM workload_records")
            .fetch_one(pool)
            .await
    }
}
