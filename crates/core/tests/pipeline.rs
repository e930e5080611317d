//! End-to-end pipeline tests: corpus -> aggregation -> forecast ->
//! summary, exercised the way the dashboard query path composes them.

use chrono::{Days, NaiveTime, TimeZone, Utc};
use gridpulse_core::aggregation::{aggregate, Granularity, Metric};
use gridpulse_core::corpus::{build_corpus, CorpusConfig};
use gridpulse_core::forecast::forecast;
use gridpulse_core::summary::{summarize, ForecastSummary};
use gridpulse_core::types::Timestamp;
use gridpulse_core::workload::WorkloadRecord;

const SEED: u64 = 90210;

fn config() -> CorpusConfig {
    CorpusConfig {
        day_count: 7,
        owner_ids: vec!["user-ada".into(), "user-grace".into()],
        zone_ids: vec!["us-east-1".into(), "eu-west-2".into()],
    }
}

fn now() -> Timestamp {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

/// End of the newest corpus day. Submissions for day offset 0 can land
/// anywhere inside that calendar day, so aggregation windows must cover
/// it fully.
fn window_end() -> Timestamp {
    Utc.with_ymd_and_hms(2025, 6, 15, 23, 59, 59).unwrap()
}

fn window_start(day_count: u32) -> Timestamp {
    let first_day = now()
        .date_naive()
        .checked_sub_days(Days::new(u64::from(day_count - 1)))
        .unwrap();
    Utc.from_utc_datetime(&first_day.and_time(NaiveTime::MIN))
}

fn seven_day_corpus() -> Vec<WorkloadRecord> {
    build_corpus(&config(), now(), SEED).unwrap()
}

// ---------------------------------------------------------------------------
// Record invariants
// ---------------------------------------------------------------------------

#[test]
fn every_record_satisfies_the_ledger_invariants() {
    for record in &seven_day_corpus() {
        assert!(record.energy_consumed_kwh >= 1.0, "{}", record.id);
        assert!(record.cost >= 0.0, "{}", record.id);
        assert!(record.carbon_emitted_kg >= 0.0, "{}", record.id);
        assert!(record.actual_start >= record.submitted_at, "{}", record.id);
        assert!(record.actual_end > record.actual_start, "{}", record.id);
        assert!(record.submitted_at >= window_start(7), "{}", record.id);
    }
}

#[test]
fn corpus_is_reproducible_from_its_seed() {
    assert_eq!(seven_day_corpus(), seven_day_corpus());
}

// ---------------------------------------------------------------------------
// End-to-end: 7 days of history, 3 projected days
// ---------------------------------------------------------------------------

#[test]
fn seven_day_corpus_aggregates_and_forecasts() {
    let records = seven_day_corpus();
    let buckets = aggregate(&records, Granularity::Day, window_start(7), window_end());
    assert_eq!(buckets.len(), 7);

    // Every record landed in a bucket.
    let bucketed: u64 = buckets.iter().map(|b| b.sample_count).sum();
    assert_eq!(bucketed, records.len() as u64);

    let points = forecast(&buckets, 3, Metric::Energy, Granularity::Day);
    let futures: Vec<_> = points.iter().filter(|p| p.forecast_value.is_some()).collect();
    assert_eq!(futures.len(), 3);

    for point in &futures {
        let central = point.forecast_value.unwrap();
        assert!(point.lower_bound.unwrap() <= central);
        assert!(central <= point.upper_bound.unwrap());
        assert!(point.lower_bound.unwrap() >= 0.0);
    }
}

#[test]
fn summary_reflects_the_projected_series() {
    let records = seven_day_corpus();
    let buckets = aggregate(&records, Granularity::Day, window_start(7), window_end());

    let energy = forecast(&buckets, 3, Metric::Energy, Granularity::Day);
    let cost = forecast(&buckets, 3, Metric::Cost, Granularity::Day);
    let carbon = forecast(&buckets, 3, Metric::Carbon, Granularity::Day);
    let summary = ForecastSummary::from_series(&energy, &cost, &carbon);

    let projected_energy: f64 = energy.iter().filter_map(|p| p.forecast_value).sum();
    assert!((summary.energy.total_forecast - projected_energy).abs() < 1e-9);
    assert!(summary.energy.total_forecast > 0.0);
    assert!(summary.energy.peak_period.is_some());
    assert!(summary.energy.peak_value >= summary.energy.average_per_period);

    assert!(summary.cost.total_forecast > 0.0);
    assert!(summary.carbon.total_forecast > 0.0);
}

// ---------------------------------------------------------------------------
// Scoped aggregation (per-owner view)
// ---------------------------------------------------------------------------

#[test]
fn owner_scoped_records_aggregate_to_a_subset() {
    let records = seven_day_corpus();
    let scoped: Vec<WorkloadRecord> = records
        .iter()
        .filter(|r| r.owner_id == "user-ada")
        .cloned()
        .collect();

    let all = aggregate(&records, Granularity::Day, window_start(7), window_end());
    let mine = aggregate(&scoped, Granularity::Day, window_start(7), window_end());

    assert_eq!(all.len(), mine.len());
    for (full, subset) in all.iter().zip(&mine) {
        assert!(subset.sample_count <= full.sample_count);
        assert!(subset.totals.energy_kwh <= full.totals.energy_kwh + 1e-9);
        assert!(subset.distinct_owner_count <= 1);
    }
}

// ---------------------------------------------------------------------------
// Insufficient data propagates as empty, not as an error
// ---------------------------------------------------------------------------

#[test]
fn empty_ledger_flows_through_as_empty_results() {
    let points = forecast(&[], 7, Metric::Energy, Granularity::Day);
    assert!(points.is_empty());

    let summary = summarize(&points);
    assert!((summary.total_forecast).abs() < f64::EPSILON);
    assert_eq!(summary.peak_period, None);
}
