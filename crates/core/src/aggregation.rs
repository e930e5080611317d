//! Aggregation of irregular workload records into uniform calendar buckets.
//!
//! Buckets are derived on demand from the immutable record set and never
//! persisted; aggregating the same records twice yields identical output.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::types::Timestamp;
use crate::workload::WorkloadRecord;

// ---------------------------------------------------------------------------
// Granularity
// ---------------------------------------------------------------------------

/// Calendar bucketing granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    /// Start of the calendar period containing `date`. Weeks are ISO
    /// weeks starting Monday.
    pub fn period_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Week => date.week(Weekday::Mon).first_day(),
            Self::Month => date.with_day(1).unwrap_or(date),
        }
    }

    /// Start of the period after the one starting at `start`.
    pub fn next_period(self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Day => start.checked_add_days(Days::new(1)),
            Self::Week => start.checked_add_days(Days::new(7)),
            Self::Month => start.checked_add_months(Months::new(1)),
        }
    }

    /// Days of history the dashboard loads before forecasting.
    pub fn default_history_days(self) -> u32 {
        match self {
            Self::Day => 30,
            Self::Week => 90,
            Self::Month => 180,
        }
    }

    /// Future periods projected by default.
    pub fn default_periods_ahead(self) -> u32 {
        match self {
            Self::Day => 7,
            Self::Week => 4,
            Self::Month => 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// The three dashboard metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Energy,
    Cost,
    Carbon,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Energy, Metric::Cost, Metric::Carbon];
}

/// Per-bucket metric sums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricTotals {
    pub energy_kwh: f64,
    pub cost: f64,
    pub carbon_kg: f64,
}

impl MetricTotals {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Energy => self.energy_kwh,
            Metric::Cost => self.cost,
            Metric::Carbon => self.carbon_kg,
        }
    }
}

/// One uniform calendar period with summed metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedBucket {
    /// First day of the period.
    pub period_start: NaiveDate,
    /// First day of the *next* period (exclusive end).
    pub period_end: NaiveDate,
    pub totals: MetricTotals,
    pub sample_count: u64,
    pub distinct_owner_count: u64,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Bucket `records` into uniform periods covering `[window_start,
/// window_end]`.
///
/// Every calendar period intersecting the window yields exactly one
/// bucket, zero-filled when no record falls inside it, so charts render a
/// contiguous axis. Records outside the window are ignored. Non-finite
/// metric values accumulate as zero; a malformed record never fails the
/// aggregation.
pub fn aggregate(
    records: &[WorkloadRecord],
    granularity: Granularity,
    window_start: Timestamp,
    window_end: Timestamp,
) -> Vec<AggregatedBucket> {
    if window_end < window_start {
        return Vec::new();
    }

    // Seed one zero bucket per calendar period in the window.
    let mut buckets: BTreeMap<NaiveDate, (MetricTotals, u64, BTreeSet<&str>)> = BTreeMap::new();
    let mut start = granularity.period_start(window_start.date_naive());
    let last = window_end.date_naive();
    while start <= last {
        buckets.insert(start, (MetricTotals::default(), 0, BTreeSet::new()));
        match granularity.next_period(start) {
            Some(next) => start = next,
            None => break,
        }
    }

    for record in records {
        if record.submitted_at < window_start || record.submitted_at > window_end {
            continue;
        }
        let period = granularity.period_start(record.submitted_at.date_naive());
        let Some((totals, count, owners)) = buckets.get_mut(&period) else {
            continue;
        };
        totals.energy_kwh += finite_or_zero(record.energy_consumed_kwh);
        totals.cost += finite_or_zero(record.cost);
        totals.carbon_kg += finite_or_zero(record.carbon_emitted_kg);
        *count += 1;
        owners.insert(record.owner_id.as_str());
    }

    buckets
        .into_iter()
        .map(|(period_start, (totals, sample_count, owners))| AggregatedBucket {
            period_start,
            period_end: granularity.next_period(period_start).unwrap_or(period_start),
            totals,
            sample_count,
            distinct_owner_count: owners.len() as u64,
        })
        .collect()
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workload::{Urgency, WorkloadType};
    use chrono::{TimeZone, Utc};

    fn record(submitted: Timestamp, owner: &str, energy: f64, cost: f64, carbon: f64) -> WorkloadRecord {
        WorkloadRecord {
            id: format!("JOB-HIST-00000-{:03}", submitted.timestamp() % 1000),
            workload_type: WorkloadType::InferenceBatch,
            submitted_at: submitted,
            gpu_minutes: 60.0,
            cpu_cores: 8,
            memory_gb: 32,
            urgency: Urgency::Medium,
            energy_consumed_kwh: energy,
            cost,
            carbon_emitted_kg: carbon,
            actual_start: submitted,
            actual_end: submitted + chrono::Duration::minutes(60),
            owner_id: owner.to_string(),
            zone_id: "us-east-1".to_string(),
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    // -- bucket counts and zero-fill --

    #[test]
    fn seven_day_window_yields_seven_daily_buckets() {
        let buckets = aggregate(&[], Granularity::Day, at(2025, 6, 1, 0), at(2025, 6, 7, 23));
        assert_eq!(buckets.len(), 7);
        for bucket in &buckets {
            assert_eq!(bucket.sample_count, 0);
            assert_eq!(bucket.distinct_owner_count, 0);
            assert!((bucket.totals.energy_kwh).abs() < f64::EPSILON);
            assert!((bucket.totals.cost).abs() < f64::EPSILON);
            assert!((bucket.totals.carbon_kg).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn daily_buckets_are_contiguous() {
        let buckets = aggregate(&[], Granularity::Day, at(2025, 6, 1, 0), at(2025, 6, 7, 0));
        for pair in buckets.windows(2) {
            assert_eq!(pair[0].period_end, pair[1].period_start);
        }
    }

    #[test]
    fn week_buckets_start_on_monday() {
        // 2025-06-04 is a Wednesday; the containing ISO week starts 06-02.
        let buckets = aggregate(&[], Granularity::Week, at(2025, 6, 4, 0), at(2025, 6, 20, 0));
        assert_eq!(buckets[0].period_start, NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        for bucket in &buckets {
            assert_eq!(bucket.period_start.weekday(), Weekday::Mon);
        }
    }

    #[test]
    fn month_buckets_across_year_boundary() {
        let buckets = aggregate(&[], Granularity::Month, at(2024, 11, 15, 0), at(2025, 2, 10, 0));
        let starts: Vec<NaiveDate> = buckets.iter().map(|b| b.period_start).collect();
        assert_eq!(
            starts,
            vec![
                NaiveDate::from_ymd_opt(2024, 11, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            ]
        );
    }

    // -- sums --

    #[test]
    fn records_sum_into_their_period() {
        let records = vec![
            record(at(2025, 6, 2, 9), "alice", 10.0, 1.5, 2.0),
            record(at(2025, 6, 2, 15), "bob", 5.0, 0.8, 1.0),
            record(at(2025, 6, 3, 9), "alice", 7.0, 1.1, 1.4),
        ];
        let buckets = aggregate(&records, Granularity::Day, at(2025, 6, 2, 0), at(2025, 6, 3, 23));

        assert_eq!(buckets.len(), 2);
        assert!((buckets[0].totals.energy_kwh - 15.0).abs() < 1e-9);
        assert!((buckets[0].totals.cost - 2.3).abs() < 1e-9);
        assert!((buckets[0].totals.carbon_kg - 3.0).abs() < 1e-9);
        assert_eq!(buckets[0].sample_count, 2);
        assert_eq!(buckets[0].distinct_owner_count, 2);
        assert_eq!(buckets[1].sample_count, 1);
        assert_eq!(buckets[1].distinct_owner_count, 1);
    }

    #[test]
    fn duplicate_owners_count_once() {
        let records = vec![
            record(at(2025, 6, 2, 9), "alice", 1.0, 0.1, 0.1),
            record(at(2025, 6, 2, 10), "alice", 1.0, 0.1, 0.1),
        ];
        let buckets = aggregate(&records, Granularity::Day, at(2025, 6, 2, 0), at(2025, 6, 2, 23));
        assert_eq!(buckets[0].sample_count, 2);
        assert_eq!(buckets[0].distinct_owner_count, 1);
    }

    #[test]
    fn records_outside_window_are_ignored() {
        let records = vec![record(at(2025, 6, 10, 9), "alice", 10.0, 1.0, 1.0)];
        let buckets = aggregate(&records, Granularity::Day, at(2025, 6, 1, 0), at(2025, 6, 7, 23));
        assert!(buckets.iter().all(|b| b.sample_count == 0));
    }

    // -- defensiveness --

    #[test]
    fn non_finite_values_accumulate_as_zero() {
        let mut bad = record(at(2025, 6, 2, 9), "alice", f64::NAN, f64::INFINITY, 1.0);
        bad.carbon_emitted_kg = f64::NEG_INFINITY;
        let buckets = aggregate(
            &[bad],
            Granularity::Day,
            at(2025, 6, 2, 0),
            at(2025, 6, 2, 23),
        );
        assert_eq!(buckets[0].sample_count, 1);
        assert!((buckets[0].totals.energy_kwh).abs() < f64::EPSILON);
        assert!((buckets[0].totals.cost).abs() < f64::EPSILON);
        assert!((buckets[0].totals.carbon_kg).abs() < f64::EPSILON);
    }

    #[test]
    fn inverted_window_yields_no_buckets() {
        let buckets = aggregate(&[], Granularity::Day, at(2025, 6, 7, 0), at(2025, 6, 1, 0));
        assert!(buckets.is_empty());
    }

    // -- idempotence --

    #[test]
    fn aggregation_is_idempotent() {
        let records = vec![
            record(at(2025, 6, 2, 9), "alice", 10.0, 1.5, 2.0),
            record(at(2025, 6, 5, 9), "bob", 5.0, 0.8, 1.0),
        ];
        let first = aggregate(&records, Granularity::Day, at(2025, 6, 1, 0), at(2025, 6, 7, 23));
        let second = aggregate(&records, Granularity::Day, at(2025, 6, 1, 0), at(2025, 6, 7, 23));
        assert_eq!(first, second);
    }

    // -- granularity defaults --

    #[test]
    fn default_windows_match_granularity() {
        assert_eq!(Granularity::Day.default_history_days(), 30);
        assert_eq!(Granularity::Day.default_periods_ahead(), 7);
        assert_eq!(Granularity::Week.default_history_days(), 90);
        assert_eq!(Granularity::Week.default_periods_ahead(), 4);
        assert_eq!(Granularity::Month.default_history_days(), 180);
        assert_eq!(Granularity::Month.default_periods_ahead(), 3);
    }
}
