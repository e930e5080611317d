//! Metric forecasting over aggregated history.
//!
//! Simple, explainable projection: a trailing moving average, an additive
//! least-squares trend when the window shows one, and a band of one
//! sample standard deviation. Deliberately not ARIMA-grade; the output is
//! a dashboard guide, not a billing commitment.

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregation::{AggregatedBucket, Granularity, Metric};

// ---------------------------------------------------------------------------
// Tuning constants
// ---------------------------------------------------------------------------

/// Number of trailing buckets the projection is fitted over.
pub const TRAILING_WINDOW: usize = 7;

/// A least-squares slope below this fraction of the window mean is
/// treated as noise and not extrapolated.
pub const TREND_SIGNIFICANCE_RATIO: f64 = 0.05;

// ---------------------------------------------------------------------------
// Points
// ---------------------------------------------------------------------------

/// One period in a forecast series.
///
/// Historical periods carry `actual_value` only; projected periods carry
/// `forecast_value` with its uncertainty band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub period_start: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<f64>,
}

// ---------------------------------------------------------------------------
// Forecasting
// ---------------------------------------------------------------------------

/// Project `periods_ahead` future buckets for `metric` past the end of
/// `historical`, returning the historical points followed by the
/// projected ones.
///
/// Returns an empty vec when `historical` is empty -- insufficient data
/// is a valid result, not an error.
pub fn forecast(
    historical: &[AggregatedBucket],
    periods_ahead: u32,
    metric: Metric,
    granularity: Granularity,
) -> Vec<ForecastPoint> {
    let Some(last_bucket) = historical.last() else {
        return Vec::new();
    };

    let values: Vec<f64> = historical.iter().map(|b| b.totals.get(metric)).collect();
    let window = &values[values.len().saturating_sub(TRAILING_WINDOW)..];

    let center = mean(window);
    let sigma = sample_std_dev(window);
    let slope = least_squares_slope(window);
    let trend = if slope.abs() >= TREND_SIGNIFICANCE_RATIO * center.abs() {
        slope
    } else {
        0.0
    };

    let mut points: Vec<ForecastPoint> = historical
        .iter()
        .map(|bucket| ForecastPoint {
            period_start: bucket.period_start,
            actual_value: Some(bucket.totals.get(metric)),
            forecast_value: None,
            lower_bound: None,
            upper_bound: None,
        })
        .collect();

    let mut period = last_bucket.period_end;
    for step in 1..=periods_ahead {
        let central = (center + trend * f64::from(step)).max(0.0);
        points.push(ForecastPoint {
            period_start: period,
            actual_value: None,
            forecast_value: Some(central),
            lower_bound: Some((central - sigma).max(0.0)),
            upper_bound: Some(central + sigma),
        });
        match granularity.next_period(period) {
            Some(next) => period = next,
            None => break,
        }
    }

    points
}

// ---------------------------------------------------------------------------
// Window statistics
// ---------------------------------------------------------------------------

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n-1 denominator); 0 for windows shorter
/// than 2.
fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Least-squares slope of `values` against x = 0, 1, 2, ...; 0 for
/// windows shorter than 2.
fn least_squares_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let x_mean = (n as f64 - 1.0) / 2.0;
    let y_mean = mean(values);
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, value) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator += dx * (value - y_mean);
        denominator += dx * dx;
    }
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::MetricTotals;
    use chrono::Days;

    fn day_bucket(start: NaiveDate, energy: f64) -> AggregatedBucket {
        AggregatedBucket {
            period_start: start,
            period_end: start.checked_add_days(Days::new(1)).unwrap(),
            totals: MetricTotals {
                energy_kwh: energy,
                cost: energy * 0.15,
                carbon_kg: energy * 0.2,
            },
            sample_count: 1,
            distinct_owner_count: 1,
        }
    }

    fn history(values: &[f64]) -> Vec<AggregatedBucket> {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| day_bucket(start.checked_add_days(Days::new(i as u64)).unwrap(), *v))
            .collect()
    }

    // -- empty history --

    #[test]
    fn empty_history_yields_empty_forecast() {
        let points = forecast(&[], 7, Metric::Energy, Granularity::Day);
        assert!(points.is_empty());
    }

    // -- shape --

    #[test]
    fn output_is_history_plus_horizon() {
        let points = forecast(&history(&[10.0; 10]), 3, Metric::Energy, Granularity::Day);
        assert_eq!(points.len(), 13);
        assert_eq!(points.iter().filter(|p| p.actual_value.is_some()).count(), 10);
        assert_eq!(points.iter().filter(|p| p.forecast_value.is_some()).count(), 3);
    }

    #[test]
    fn each_point_is_actual_xor_forecast() {
        let points = forecast(&history(&[5.0; 8]), 4, Metric::Energy, Granularity::Day);
        for point in &points {
            assert!(point.actual_value.is_some() != point.forecast_value.is_some());
            assert_eq!(point.forecast_value.is_some(), point.lower_bound.is_some());
            assert_eq!(point.forecast_value.is_some(), point.upper_bound.is_some());
        }
    }

    #[test]
    fn future_periods_continue_the_calendar() {
        let points = forecast(&history(&[5.0; 3]), 2, Metric::Energy, Granularity::Day);
        assert_eq!(points[3].period_start, NaiveDate::from_ymd_opt(2025, 6, 4).unwrap());
        assert_eq!(points[4].period_start, NaiveDate::from_ymd_opt(2025, 6, 5).unwrap());
    }

    // -- flat series --

    #[test]
    fn flat_history_extrapolates_flat_with_zero_band() {
        let points = forecast(&history(&[12.0; 9]), 3, Metric::Energy, Granularity::Day);
        for point in points.iter().filter(|p| p.forecast_value.is_some()) {
            let v = point.forecast_value.unwrap();
            assert!((v - 12.0).abs() < 1e-9);
            assert!((point.lower_bound.unwrap() - 12.0).abs() < 1e-9);
            assert!((point.upper_bound.unwrap() - 12.0).abs() < 1e-9);
        }
    }

    // -- trend --

    #[test]
    fn strong_linear_trend_is_extrapolated() {
        // 10, 20, ..., 70: slope 10 per period, well past significance.
        let points = forecast(
            &history(&[10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0]),
            2,
            Metric::Energy,
            Granularity::Day,
        );
        let forecasts: Vec<f64> = points.iter().filter_map(|p| p.forecast_value).collect();
        // Window mean 40, slope 10: next steps are 50 and 60.
        assert!((forecasts[0] - 50.0).abs() < 1e-9);
        assert!((forecasts[1] - 60.0).abs() < 1e-9);
    }

    #[test]
    fn weak_trend_is_flattened() {
        // Slope ~0.1 on a mean of ~100 is below the significance ratio.
        let points = forecast(
            &history(&[100.0, 100.1, 100.2, 100.3, 100.4, 100.5, 100.6]),
            3,
            Metric::Energy,
            Granularity::Day,
        );
        let forecasts: Vec<f64> = points.iter().filter_map(|p| p.forecast_value).collect();
        assert!((forecasts[0] - forecasts[2]).abs() < 1e-9);
    }

    #[test]
    fn trend_only_fits_trailing_window() {
        // Old spike outside the 7-bucket window must not affect the fit.
        let mut values = vec![1000.0, 1000.0, 1000.0];
        values.extend([10.0; 7]);
        let points = forecast(&history(&values), 2, Metric::Energy, Granularity::Day);
        for point in points.iter().filter(|p| p.forecast_value.is_some()) {
            assert!((point.forecast_value.unwrap() - 10.0).abs() < 1e-9);
        }
    }

    // -- bounds --

    #[test]
    fn bounds_bracket_the_central_estimate() {
        let points = forecast(
            &history(&[8.0, 14.0, 9.0, 13.0, 10.0, 12.0, 11.0]),
            4,
            Metric::Energy,
            Granularity::Day,
        );
        for point in points.iter().filter(|p| p.forecast_value.is_some()) {
            let v = point.forecast_value.unwrap();
            assert!(point.lower_bound.unwrap() <= v);
            assert!(v <= point.upper_bound.unwrap());
            assert!(point.lower_bound.unwrap() >= 0.0);
        }
    }

    #[test]
    fn lower_bound_is_floored_at_zero() {
        // High variance around a small mean pushes center - sigma negative.
        let points = forecast(
            &history(&[0.0, 6.0, 0.0, 6.0, 0.0, 6.0, 0.0]),
            1,
            Metric::Energy,
            Granularity::Day,
        );
        let future = points.iter().find(|p| p.forecast_value.is_some()).unwrap();
        assert!((future.lower_bound.unwrap() - 0.0).abs() < 1e-9);
        assert!(future.upper_bound.unwrap() > future.forecast_value.unwrap());
    }

    #[test]
    fn declining_trend_never_projects_negative() {
        let points = forecast(
            &history(&[60.0, 50.0, 40.0, 30.0, 20.0, 10.0, 0.0]),
            5,
            Metric::Energy,
            Granularity::Day,
        );
        for point in points.iter().filter(|p| p.forecast_value.is_some()) {
            assert!(point.forecast_value.unwrap() >= 0.0);
        }
    }

    // -- per-metric selection --

    #[test]
    fn cost_series_reads_cost_totals() {
        let points = forecast(&history(&[10.0; 7]), 1, Metric::Cost, Granularity::Day);
        let future = points.iter().find(|p| p.forecast_value.is_some()).unwrap();
        assert!((future.forecast_value.unwrap() - 1.5).abs() < 1e-9);
    }

    // -- statistics helpers --

    #[test]
    fn std_dev_of_short_window_is_zero() {
        assert!((sample_std_dev(&[5.0]) - 0.0).abs() < f64::EPSILON);
        assert!((sample_std_dev(&[]) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn slope_of_known_series() {
        assert!((least_squares_slope(&[0.0, 1.0, 2.0, 3.0]) - 1.0).abs() < 1e-9);
        assert!((least_squares_slope(&[3.0, 2.0, 1.0, 0.0]) + 1.0).abs() < 1e-9);
        assert!((least_squares_slope(&[7.0, 7.0, 7.0]) - 0.0).abs() < 1e-9);
    }
}
