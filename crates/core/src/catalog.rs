//! Workload profile catalog.
//!
//! Static per-type configuration: base energy draw, nominal duration, and
//! resource ranges. The catalog is data, not code -- the corpus builder
//! and synthesizer read it, nothing writes it.

use rand::Rng;

use crate::workload::WorkloadType;

// ---------------------------------------------------------------------------
// Range types
// ---------------------------------------------------------------------------

/// Inclusive floating-point range, sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatRange {
    pub min: f64,
    pub max: f64,
}

impl FloatRange {
    pub fn sample(&self, rng: &mut impl Rng) -> f64 {
        rng.random_range(self.min..=self.max)
    }
}

/// Inclusive integer range, sampled uniformly. Degenerate ranges
/// (min == max) always yield the single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRange {
    pub min: i32,
    pub max: i32,
}

impl IntRange {
    pub fn sample(&self, rng: &mut impl Rng) -> i32 {
        rng.random_range(self.min..=self.max)
    }
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

/// Static configuration for one workload type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkloadProfile {
    /// Energy draw of a nominal run before resource and variance terms, kWh.
    pub base_energy_kwh: f64,
    /// Nominal wall-clock duration, minutes.
    pub nominal_duration_minutes: f64,
    pub gpu_minutes: FloatRange,
    pub cpu_cores: IntRange,
    pub memory_gb: IntRange,
}

const TRAINING_RUN: WorkloadProfile = WorkloadProfile {
    base_energy_kwh: 50.0,
    nominal_duration_minutes: 480.0,
    gpu_minutes: FloatRange { min: 240.0, max: 960.0 },
    cpu_cores: IntRange { min: 16, max: 16 },
    memory_gb: IntRange { min: 64, max: 64 },
};

const INFERENCE_BATCH: WorkloadProfile = WorkloadProfile {
    base_energy_kwh: 15.0,
    nominal_duration_minutes: 60.0,
    gpu_minutes: FloatRange { min: 30.0, max: 120.0 },
    cpu_cores: IntRange { min: 8, max: 8 },
    memory_gb: IntRange { min: 32, max: 32 },
};

const DATA_PROCESSING: WorkloadProfile = WorkloadProfile {
    base_energy_kwh: 25.0,
    nominal_duration_minutes: 180.0,
    gpu_minutes: FloatRange { min: 60.0, max: 300.0 },
    cpu_cores: IntRange { min: 12, max: 12 },
    memory_gb: IntRange { min: 48, max: 48 },
};

const FINE_TUNING: WorkloadProfile = WorkloadProfile {
    base_energy_kwh: 35.0,
    nominal_duration_minutes: 300.0,
    gpu_minutes: FloatRange { min: 120.0, max: 480.0 },
    cpu_cores: IntRange { min: 16, max: 16 },
    memory_gb: IntRange { min: 64, max: 64 },
};

const RAG_QUERY: WorkloadProfile = WorkloadProfile {
    base_energy_kwh: 5.0,
    nominal_duration_minutes: 20.0,
    gpu_minutes: FloatRange { min: 5.0, max: 30.0 },
    cpu_cores: IntRange { min: 4, max: 4 },
    memory_gb: IntRange { min: 16, max: 16 },
};

/// Look up the profile for a workload type.
///
/// Total: the enum is closed, so every type has a profile. Unrecognized
/// type *strings* fail earlier, at parse time, with `UnknownWorkloadType`.
pub const fn profile(workload_type: WorkloadType) -> &'static WorkloadProfile {
    match workload_type {
        WorkloadType::TrainingRun => &TRAINING_RUN,
        WorkloadType::InferenceBatch => &INFERENCE_BATCH,
        WorkloadType::DataProcessing => &DATA_PROCESSING,
        WorkloadType::FineTuning => &FINE_TUNING,
        WorkloadType::RagQuery => &RAG_QUERY,
    }
}
