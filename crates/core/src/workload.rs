//! Workload record types and enums.
//!
//! [`WorkloadRecord`] is the unit of the synthetic historical ledger:
//! created once by the corpus builder, never mutated afterwards, replaced
//! only by whole-dataset regeneration.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Workload type
// ---------------------------------------------------------------------------

/// Enumerated category of compute job. Parameterizes the base resource and
/// energy assumptions in the workload profile catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkloadType {
    TrainingRun,
    InferenceBatch,
    DataProcessing,
    FineTuning,
    RagQuery,
}

impl WorkloadType {
    /// All workload types, in catalog order.
    pub const ALL: [WorkloadType; 5] = [
        WorkloadType::TrainingRun,
        WorkloadType::InferenceBatch,
        WorkloadType::DataProcessing,
        WorkloadType::FineTuning,
        WorkloadType::RagQuery,
    ];

    /// Canonical storage/wire name (matches the database CHECK constraint).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TrainingRun => "TRAINING_RUN",
            Self::InferenceBatch => "INFERENCE_BATCH",
            Self::DataProcessing => "DATA_PROCESSING",
            Self::FineTuning => "FINE_TUNING",
            Self::RagQuery => "RAG_QUERY",
        }
    }
}

impl std::str::FromStr for WorkloadType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TRAINING_RUN" => Ok(Self::TrainingRun),
            "INFERENCE_BATCH" => Ok(Self::InferenceBatch),
            "DATA_PROCESSING" => Ok(Self::DataProcessing),
            "FINE_TUNING" => Ok(Self::FineTuning),
            "RAG_QUERY" => Ok(Self::RagQuery),
            other => Err(CoreError::UnknownWorkloadType(other.to_string())),
        }
    }
}

impl std::fmt::Display for WorkloadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Urgency
// ---------------------------------------------------------------------------

/// How quickly the submitter wants the workload scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    /// Canonical storage/wire name (matches the database CHECK constraint).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl std::str::FromStr for Urgency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            other => Err(CoreError::Validation(format!("Unknown urgency: {other}"))),
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Workload record
// ---------------------------------------------------------------------------

/// One synthesized compute job in the historical ledger.
///
/// Invariants maintained by the corpus builder: energy is at least
/// 1.0 kWh, cost and carbon are non-negative, `actual_start` is at or
/// after `submitted_at`, and `actual_end` is strictly after
/// `actual_start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadRecord {
    pub id: String,
    pub workload_type: WorkloadType,
    pub submitted_at: Timestamp,
    pub gpu_minutes: f64,
    pub cpu_cores: i32,
    pub memory_gb: i32,
    pub urgency: Urgency,
    pub energy_consumed_kwh: f64,
    /// Cost in the account's billing currency.
    pub cost: f64,
    pub carbon_emitted_kg: f64,
    pub actual_start: Timestamp,
    pub actual_end: Timestamp,
    pub owner_id: String,
    pub zone_id: String,
}
