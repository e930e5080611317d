//! Canonical telemetry synthesis formulas.
//!
//! Energy, cost, and carbon for a workload are computed in exactly one
//! place. The bulk corpus builder and any on-demand path both go through
//! [`synthesize`]; randomness enters only through [`SynthesisDraws`], so
//! exact-value tests can pin the draws instead of stubbing an RNG.

use chrono::Timelike;
use rand::Rng;

use crate::catalog;
use crate::types::Timestamp;
use crate::workload::WorkloadType;

// ---------------------------------------------------------------------------
// Formula constants
// ---------------------------------------------------------------------------

/// Minimum energy any workload can report, kWh.
pub const ENERGY_FLOOR_KWH: f64 = 1.0;

/// Additional kWh per GPU-hour consumed.
pub const ENERGY_PER_GPU_HOUR_KWH: f64 = 0.3;

/// Additional kWh per allocated CPU core.
pub const ENERGY_PER_CPU_CORE_KWH: f64 = 0.1;

/// Energy variance amplitude as a fraction of the profile's base energy.
pub const ENERGY_VARIANCE_FRACTION: f64 = 0.15;

/// Billing rate per kWh before the zone multiplier.
pub const COST_PER_KWH: f64 = 0.15;

/// Zone pricing multiplier bounds.
pub const ZONE_MULTIPLIER_MIN: f64 = 0.8;
pub const ZONE_MULTIPLIER_MAX: f64 = 1.2;

/// Grid carbon intensity bounds before the diurnal factor, gCO2e/kWh.
pub const CARBON_INTENSITY_MIN_G_PER_KWH: f64 = 180.0;
pub const CARBON_INTENSITY_MAX_G_PER_KWH: f64 = 280.0;

/// Jitter bounds applied to the profile's nominal duration.
pub const DURATION_JITTER_MIN: f64 = 0.8;
pub const DURATION_JITTER_MAX: f64 = 1.2;

/// Maximum queue delay between submission and actual start, minutes.
pub const MAX_START_DELAY_MINUTES: f64 = 5.0;

/// Diurnal carbon-intensity factor for an hour of day (0-23).
///
/// Midday solar surplus pushes grid intensity down; the morning and
/// evening ramps push it up.
pub fn carbon_intensity_factor(hour: u32) -> f64 {
    match hour {
        10..=16 => 0.7,
        6..=9 | 17..=22 => 1.2,
        _ => 1.0,
    }
}

// ---------------------------------------------------------------------------
// Draws
// ---------------------------------------------------------------------------

/// The random draws behind one synthesized record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthesisDraws {
    /// Signed fraction of base energy, in [-0.15, 0.15].
    pub variance_fraction: f64,
    /// Zone pricing multiplier, in [0.8, 1.2].
    pub zone_multiplier: f64,
    /// Grid carbon intensity before the diurnal factor, gCO2e/kWh.
    pub carbon_intensity_g_per_kwh: f64,
    /// Multiplier on the profile's nominal duration, in [0.8, 1.2].
    pub duration_jitter: f64,
    /// Queue delay before the job actually starts, minutes.
    pub start_delay_minutes: f64,
}

impl SynthesisDraws {
    pub fn sample(rng: &mut impl Rng) -> Self {
        Self {
            variance_fraction: rng.random_range(-ENERGY_VARIANCE_FRACTION..=ENERGY_VARIANCE_FRACTION),
            zone_multiplier: rng.random_range(ZONE_MULTIPLIER_MIN..=ZONE_MULTIPLIER_MAX),
            carbon_intensity_g_per_kwh: rng
                .random_range(CARBON_INTENSITY_MIN_G_PER_KWH..=CARBON_INTENSITY_MAX_G_PER_KWH),
            duration_jitter: rng.random_range(DURATION_JITTER_MIN..=DURATION_JITTER_MAX),
            start_delay_minutes: rng.random_range(0.0..=MAX_START_DELAY_MINUTES),
        }
    }

    /// Draws that reproduce the profile's nominal behaviour exactly:
    /// no variance, unit zone pricing, midpoint grid intensity, nominal
    /// duration, immediate start.
    pub const NOMINAL: SynthesisDraws = SynthesisDraws {
        variance_fraction: 0.0,
        zone_multiplier: 1.0,
        carbon_intensity_g_per_kwh: 230.0,
        duration_jitter: 1.0,
        start_delay_minutes: 0.0,
    };
}

// ---------------------------------------------------------------------------
// Synthesis
// ---------------------------------------------------------------------------

/// Synthesized telemetry for one workload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthesizedTelemetry {
    pub energy_kwh: f64,
    /// Rounded to 2 decimals (currency).
    pub cost: f64,
    /// Rounded to 3 decimals (kg CO2e).
    pub carbon_kg: f64,
    pub duration_minutes: f64,
    pub actual_start: Timestamp,
    pub actual_end: Timestamp,
}

/// Synthesize telemetry for a workload using freshly sampled draws.
pub fn synthesize(
    workload_type: WorkloadType,
    gpu_minutes: f64,
    cpu_cores: i32,
    submitted_at: Timestamp,
    rng: &mut impl Rng,
) -> SynthesizedTelemetry {
    synthesize_with(
        workload_type,
        gpu_minutes,
        cpu_cores,
        submitted_at,
        &SynthesisDraws::sample(rng),
    )
}

/// The deterministic synthesis kernel.
///
/// Total for every catalog type; all outputs are clamped non-negative and
/// energy is floored at [`ENERGY_FLOOR_KWH`].
pub fn synthesize_with(
    workload_type: WorkloadType,
    gpu_minutes: f64,
    cpu_cores: i32,
    submitted_at: Timestamp,
    draws: &SynthesisDraws,
) -> SynthesizedTelemetry {
    let profile = catalog::profile(workload_type);

    let gpu_energy = (gpu_minutes / 60.0) * ENERGY_PER_GPU_HOUR_KWH;
    let cpu_energy = f64::from(cpu_cores) * ENERGY_PER_CPU_CORE_KWH;
    let variance = draws.variance_fraction * profile.base_energy_kwh;
    let energy_kwh =
        (profile.base_energy_kwh + gpu_energy + cpu_energy + variance).max(ENERGY_FLOOR_KWH);

    let cost = round2(energy_kwh * COST_PER_KWH * draws.zone_multiplier).max(0.0);

    let intensity =
        draws.carbon_intensity_g_per_kwh * carbon_intensity_factor(submitted_at.hour());
    let carbon_kg = round3(energy_kwh * intensity / 1000.0).max(0.0);

    let duration_minutes = profile.nominal_duration_minutes * draws.duration_jitter;
    let actual_start = submitted_at + minutes(draws.start_delay_minutes);
    let actual_end = actual_start + minutes(duration_minutes);

    SynthesizedTelemetry {
        energy_kwh,
        cost,
        carbon_kg,
        duration_minutes,
        actual_start,
        actual_end,
    }
}

/// Round to 2 decimal places (currency).
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to 3 decimal places (kg CO2e).
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Fractional minutes as a chrono duration, millisecond precision.
fn minutes(minutes: f64) -> chrono::Duration {
    chrono::Duration::milliseconds((minutes * 60_000.0).round() as i64)
}
