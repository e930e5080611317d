//! HTTP handlers.
//!
//! Handlers stay thin: resolve the query window and scope, fetch rows,
//! and delegate all computation to the pure functions in
//! `gridpulse_core`.

pub mod forecast;
pub mod seed;
pub mod usage;

use chrono::{Days, NaiveDate, NaiveTime, TimeZone, Utc};
use gridpulse_core::types::Timestamp;
use gridpulse_core::workload::WorkloadRecord;
use gridpulse_db::models::workload_record::WorkloadRecordRow;

/// Inclusive timestamp bounds for the calendar-day window `[from, to]`.
pub(crate) fn window_bounds(from: NaiveDate, to: NaiveDate) -> (Timestamp, Timestamp) {
    let start = Utc.from_utc_datetime(&from.and_time(NaiveTime::MIN));
    let next_day = to.checked_add_days(Days::new(1)).unwrap_or(to);
    let end = Utc.from_utc_datetime(&next_day.and_time(NaiveTime::MIN))
        - chrono::Duration::milliseconds(1);
    (start, end)
}

/// First day of a history window ending on `to`, `history_days` long.
pub(crate) fn history_start(to: NaiveDate, history_days: u32) -> NaiveDate {
    to.checked_sub_days(Days::new(u64::from(history_days.saturating_sub(1))))
        .unwrap_or(to)
}

/// Convert ledger rows into domain records, logging and skipping any row
/// whose stored enum text no longer parses. Aggregation is defensive;
/// one bad row must not fail a dashboard query.
pub(crate) fn into_records(rows: Vec<WorkloadRecordRow>) -> Vec<WorkloadRecord> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id.clone();
            match row.into_record() {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(error = %e, id = %id, "Skipping malformed ledger row");
                    None
                }
            }
        })
        .collect()
}
