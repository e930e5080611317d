//! Row model for the `workload_records` table.

use gridpulse_core::error::CoreError;
use gridpulse_core::types::Timestamp;
use gridpulse_core::workload::WorkloadRecord;
use serde::Serialize;
use sqlx::FromRow;

/// One row of the synthetic workload ledger.
///
/// Enums are stored as TEXT (constrained by CHECK) and parsed back into
/// the core enums on the way out, so a hand-edited or legacy row can be
/// detected and skipped instead of poisoning a whole query.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkloadRecordRow {
    pub id: String,
    pub workload_type: String,
    pub submitted_at: Timestamp,
    pub gpu_minutes: f64,
    pub cpu_cores: i32,
    pub memory_gb: i32,
    pub urgency: String,
    pub energy_consumed_kwh: f64,
    pub cost: f64,
    pub carbon_emitted_kg: f64,
    pub actual_start: Timestamp,
    pub actual_end: Timestamp,
    pub owner_id: String,
    pub zone_id: String,
}

impl WorkloadRecordRow {
    pub fn from_record(record: &WorkloadRecord) -> Self {
        Self {
            id: record.id.clone(),
            workload_type: record.workload_type.as_str().to_string(),
            submitted_at: record.submitted_at,
            gpu_minutes: record.gpu_minutes,
            cpu_cores: record.cpu_cores,
            memory_gb: record.memory_gb,
            urgency: record.urgency.as_str().to_string(),
            energy_consumed_kwh: record.energy_consumed_kwh,
            cost: record.cost,
            carbon_emitted_kg: record.carbon_emitted_kg,
            actual_start: record.actual_start,
            actual_end: record.actual_end,
            owner_id: record.owner_id.clone(),
            zone_id: record.zone_id.clone(),
        }
    }

    /// Convert back into the core domain record. Fails with a
    /// [`CoreError`] when the stored enum strings do not parse.
    pub fn into_record(self) -> Result<WorkloadRecord, CoreError> {
        Ok(WorkloadRecord {
            workload_type: self.workload_type.parse()?,
            urgency: self.urgency.parse()?,
            id: self.id,
            submitted_at: self.submitted_at,
            gpu_minutes: self.gpu_minutes,
            cpu_cores: self.cpu_cores,
            memory_gb: self.memory_gb,
            energy_consumed_kwh: self.energy_consumed_kwh,
            cost: self.cost,
            carbon_emitted_kg: self.carbon_emitted_kg,
            actual_start: self.actual_start,
            actual_end: self.actual_end,
            owner_id: self.owner_id,
            zone_id: self.zone_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use gridpulse_core::workload::{Urgency, WorkloadType};

    fn sample_record() -> WorkloadRecord {
        let submitted = Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).unwrap();
        WorkloadRecord {
            id: "JOB-HIST-00001-002".into(),
            workload_type: WorkloadType::FineTuning,
            submitted_at: submitted,
            gpu_minutes: 240.0,
            cpu_cores: 16,
            memory_gb: 64,
            urgency: Urgency::High,
            energy_consumed_kwh: 42.5,
            cost: 6.38,
            carbon_emitted_kg: 9.775,
            actual_start: submitted + chrono::Duration::minutes(2),
            actual_end: submitted + chrono::Duration::minutes(302),
            owner_id: "user-ada".into(),
            zone_id: "eu-west-2".into(),
        }
    }

    #[test]
    fn record_round_trips_through_row() {
        let record = sample_record();
        let row = WorkloadRecordRow::from_record(&record);
        assert_eq!(row.workload_type, "FINE_TUNING");
        assert_eq!(row.urgency, "HIGH");
        assert_eq!(row.into_record().unwrap(), record);
    }

    #[test]
    fn malformed_enum_text_fails_conversion() {
        let mut row = WorkloadRecordRow::from_record(&sample_record());
        row.workload_type = "MYSTERY_JOB".into();
        assert!(row.into_record().is_err());
    }
}
