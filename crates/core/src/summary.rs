//! Reduction of forecast series to scalar dashboard KPIs.

use chrono::NaiveDate;
use serde::Serialize;

use crate::forecast::ForecastPoint;

/// Scalar KPIs for one metric's projected periods.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub total_forecast: f64,
    pub average_per_period: f64,
    pub peak_value: f64,
    /// Period of the peak; ties resolve to the earliest period. `None`
    /// when the series has no projected points.
    pub peak_period: Option<NaiveDate>,
}

/// Three-metric summary attached to the dashboard forecast response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSummary {
    pub energy: MetricSummary,
    pub cost: MetricSummary,
    pub carbon: MetricSummary,
}

impl ForecastSummary {
    pub fn from_series(
        energy: &[ForecastPoint],
        cost: &[ForecastPoint],
        carbon: &[ForecastPoint],
    ) -> Self {
        Self {
            energy: summarize(energy),
            cost: summarize(cost),
            carbon: summarize(carbon),
        }
    }
}

/// Reduce the projected points of a forecast series.
///
/// Historical points are ignored. An empty series yields zeroed totals
/// and no peak.
pub fn summarize(points: &[ForecastPoint]) -> MetricSummary {
    let mut total = 0.0;
    let mut count: u32 = 0;
    let mut peak_value = 0.0;
    let mut peak_period = None;

    for point in points {
        let Some(value) = point.forecast_value else {
            continue;
        };
        total += value;
        count += 1;
        if peak_period.is_none() || value > peak_value {
            peak_value = value;
            peak_period = Some(point.period_start);
        }
    }

    MetricSummary {
        total_forecast: total,
        average_per_period: if count == 0 { 0.0 } else { total / f64::from(count) },
        peak_value,
        peak_period,
    }
}
