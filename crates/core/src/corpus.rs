//! Historical corpus builder.
//!
//! Drives the synthesizer across a range of past days, applying
//! daily-volume and diurnal distributions, to produce the synthetic
//! workload ledger the dashboard aggregates and forecasts over.
//!
//! Each day is generated on its own RNG stream derived from
//! [`day_seed`], so day generation has no cross-day draw-order coupling
//! and can run concurrently.

use chrono::{Datelike, Days, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog;
use crate::error::CoreError;
use crate::sampling::{sample_weighted, Weighted};
use crate::synthesis;
use crate::types::Timestamp;
use crate::workload::{Urgency, WorkloadRecord, WorkloadType};

// ---------------------------------------------------------------------------
// Distribution tables
// ---------------------------------------------------------------------------

/// Relative frequency of each workload type in the synthetic ledger.
pub const TYPE_WEIGHTS: [Weighted<WorkloadType>; 5] = [
    Weighted { value: WorkloadType::TrainingRun, weight: 0.25 },
    Weighted { value: WorkloadType::InferenceBatch, weight: 0.25 },
    Weighted { value: WorkloadType::DataProcessing, weight: 0.20 },
    Weighted { value: WorkloadType::FineTuning, weight: 0.15 },
    Weighted { value: WorkloadType::RagQuery, weight: 0.15 },
];

/// Relative frequency of each urgency level.
pub const URGENCY_WEIGHTS: [Weighted<Urgency>; 3] = [
    Weighted { value: Urgency::Medium, weight: 0.60 },
    Weighted { value: Urgency::Low, weight: 0.25 },
    Weighted { value: Urgency::High, weight: 0.15 },
];

// ---------------------------------------------------------------------------
// Volume and submission-time distribution
// ---------------------------------------------------------------------------

/// Workloads per weekday, inclusive bounds.
pub const WEEKDAY_VOLUME: (u32, u32) = (10, 19);

/// Workloads per weekend day, inclusive bounds.
pub const WEEKEND_VOLUME: (u32, u32) = (3, 7);

/// Probability that a workload is submitted during business hours.
pub const BUSINESS_HOURS_PROBABILITY: f64 = 0.7;

/// Business hours, `[start, end)` in hours of day.
pub const BUSINESS_HOURS: (u32, u32) = (9, 17);

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Inputs for a corpus build.
///
/// Owner and zone ids come from the identity collaborator and must be
/// non-empty; an empty set aborts the whole build.
#[derive(Debug, Clone)]
pub struct CorpusConfig {
    pub day_count: u32,
    pub owner_ids: Vec<String>,
    pub zone_ids: Vec<String>,
}

impl CorpusConfig {
    fn validate(&self) -> Result<(), CoreError> {
        if self.owner_ids.is_empty() {
            return Err(CoreError::Precondition("owner_ids must not be empty".into()));
        }
        if self.zone_ids.is_empty() {
            return Err(CoreError::Precondition("zone_ids must not be empty".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// Derive the RNG seed for one day's generation stream.
///
/// SplitMix64 finalizer over the base seed and day offset; adjacent day
/// offsets land on uncorrelated streams.
pub fn day_seed(base_seed: u64, day_offset: u32) -> u64 {
    let mut z =
        base_seed.wrapping_add(u64::from(day_offset).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// Build the full historical corpus: one independent RNG stream per day
/// offset in `[0, day_count)` counting backward from `now`, all records
/// concatenated and ordered by submission time, newest first.
///
/// Fails fast on an empty owner or zone set; there is no partial output.
/// Callers must not rely on the ordering.
pub fn build_corpus(
    config: &CorpusConfig,
    now: Timestamp,
    base_seed: u64,
) -> Result<Vec<WorkloadRecord>, CoreError> {
    config.validate()?;

    let mut records = Vec::new();
    for day_offset in 0..config.day_count {
        let mut rng = StdRng::seed_from_u64(day_seed(base_seed, day_offset));
        records.extend(build_day(config, now, day_offset, &mut rng));
    }

    records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    Ok(records)
}

/// Generate all records for a single day offset on the supplied RNG.
///
/// The config is assumed valid; an empty owner or zone set degrades to
/// empty-string ids rather than panicking.
pub fn build_day(
    config: &CorpusConfig,
    now: Timestamp,
    day_offset: u32,
    rng: &mut impl Rng,
) -> Vec<WorkloadRecord> {
    let Some(day) = now
        .date_naive()
        .checked_sub_days(Days::new(u64::from(day_offset)))
    else {
        return Vec::new();
    };

    let volume = daily_volume(day, rng);
    let mut records = Vec::with_capacity(volume as usize);
    for index in 0..volume {
        records.push(build_record(config, day, day_offset, index, rng));
    }
    records
}

fn daily_volume(day: NaiveDate, rng: &mut impl Rng) -> u32 {
    let (min, max) = if is_weekend(day) {
        WEEKEND_VOLUME
    } else {
        WEEKDAY_VOLUME
    };
    rng.random_range(min..=max)
}

fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Sample a submission timestamp within `day`, biased toward business
/// hours.
fn submission_time(day: NaiveDate, rng: &mut impl Rng) -> Timestamp {
    let hour = if rng.random_bool(BUSINESS_HOURS_PROBABILITY) {
        rng.random_range(BUSINESS_HOURS.0..BUSINESS_HOURS.1)
    } else {
        rng.random_range(0..24)
    };
    let minute = rng.random_range(0..60);
    let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
    Utc.from_utc_datetime(&day.and_time(time))
}

fn build_record(
    config: &CorpusConfig,
    day: NaiveDate,
    day_offset: u32,
    index: u32,
    rng: &mut impl Rng,
) -> WorkloadRecord {
    // The const tables are non-empty, so the fallbacks are unreachable.
    let workload_type =
        sample_weighted(&TYPE_WEIGHTS, rng).unwrap_or(WorkloadType::InferenceBatch);
    let urgency = sample_weighted(&URGENCY_WEIGHTS, rng).unwrap_or(Urgency::Medium);

    let profile = catalog::profile(workload_type);
    let gpu_minutes = profile.gpu_minutes.sample(rng);
    let cpu_cores = profile.cpu_cores.sample(rng);
    let memory_gb = profile.memory_gb.sample(rng);

    let submitted_at = submission_time(day, rng);
    let owner_id = pick(&config.owner_ids, rng);
    let zone_id = pick(&config.zone_ids, rng);

    let telemetry = synthesis::synthesize(workload_type, gpu_minutes, cpu_cores, submitted_at, rng);

    WorkloadRecord {
        id: format!("JOB-HIST-{day_offset:05}-{index:03}"),
        workload_type,
        submitted_at,
        gpu_minutes,
        cpu_cores,
        memory_gb,
        urgency,
        energy_consumed_kwh: telemetry.energy_kwh,
        cost: telemetry.cost,
        carbon_emitted_kg: telemetry.carbon_kg,
        actual_start: telemetry.actual_start,
        actual_end: telemetry.actual_end,
        owner_id,
        zone_id,
    }
}

fn pick(ids: &[String], rng: &mut impl Rng) -> String {
    if ids.is_empty() {
        return String::new();
    }
    ids[rng.random_range(0..ids.len())].clone()
}
