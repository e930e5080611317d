//! Chart-row formatting for the dashboard's combined actual/forecast
//! series.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregation::{AggregatedBucket, Metric};
use crate::forecast::ForecastPoint;

/// One chart row. Fields are omitted from JSON when absent so the chart
/// library leaves gaps instead of drawing zero lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartRow {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
}

/// One row per period across the combined historical + forecast window,
/// ordered by date.
///
/// Historical rows come from the zero-filled aggregation buckets;
/// projected rows from the forecast points. A date present in both
/// merges into a single row.
pub fn chart_rows(
    historical: &[AggregatedBucket],
    forecasts: &[ForecastPoint],
    metric: Metric,
) -> Vec<ChartRow> {
    let mut rows: BTreeMap<NaiveDate, ChartRow> = BTreeMap::new();

    for bucket in historical {
        rows.entry(bucket.period_start)
            .or_insert_with(|| blank(bucket.period_start))
            .actual = Some(bucket.totals.get(metric));
    }

    for point in forecasts {
        let row = rows
            .entry(point.period_start)
            .or_insert_with(|| blank(point.period_start));
        if let Some(value) = point.actual_value {
            row.actual.get_or_insert(value);
        }
        if let Some(value) = point.forecast_value {
            row.forecast = Some(value);
        }
        if let Some(value) = point.lower_bound {
            row.lower = Some(value);
        }
        if let Some(value) = point.upper_bound {
            row.upper = Some(value);
        }
    }

    rows.into_values().collect()
}

fn blank(date: NaiveDate) -> ChartRow {
    ChartRow {
        date,
        actual: None,
        forecast: None,
        lower: None,
        upper: None,
    }
}
