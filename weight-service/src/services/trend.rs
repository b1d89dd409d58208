//! Cross-user aggregation and trend prediction.
//!
//! Pure functions: the handler feeds them both roles' full histories plus
//! the active display window. The trend is always fitted on the full
//! history, not the visible window, so the projected line stays put while
//! the user scrolls the date range.

use crate::models::WeightRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Least-squares line through a role's weight history.
/// `intercept` is the fitted weight at the first record's timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trend {
    pub slope_per_day: f64,
    pub intercept: f64,
}

impl Trend {
    /// Projected weight `days` after the first record.
    pub fn extrapolate(&self, days: f64) -> f64 {
        self.intercept + self.slope_per_day * days
    }
}

/// Keep only records whose timestamp falls in the inclusive `[start, end]`
/// window, preserving input order. Filtering an already-filtered sequence
/// with the same bounds is a no-op.
pub fn filter_range(
    records: &[WeightRecord],
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Vec<WeightRecord> {
    records
        .iter()
        .filter(|record| record.in_window(start, end))
        .cloned()
        .collect()
}

/// Ordinary least-squares regression of weight against days since the first
/// record. `None` when fewer than 2 records exist or all records share one
/// timestamp (the slope is undefined either way).
pub fn fit_trend(records: &[WeightRecord]) -> Option<Trend> {
    if records.len() < 2 {
        return None;
    }

    let t0 = records.iter().map(|r| r.timestamp).min()?;
    let xs: Vec<f64> = records
        .iter()
        .map(|r| (r.timestamp - t0).num_seconds() as f64 / SECONDS_PER_DAY)
        .collect();

    let n = records.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = records.iter().map(|r| r.weight).sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance = 0.0;
    for (x, record) in xs.iter().zip(records) {
        let dx = x - mean_x;
        covariance += dx * (record.weight - mean_y);
        variance += dx * dx;
    }

    if variance == 0.0 {
        return None;
    }

    let slope_per_day = covariance / variance;
    let intercept = mean_y - slope_per_day * mean_x;
    Some(Trend {
        slope_per_day,
        intercept,
    })
}
