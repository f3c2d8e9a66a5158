//! Observed and forecast bands.
//!
//! Bands align with the rows by index, not by timestamp: point `i` of each
//! band comes from row `i`, whatever its timestamp.

use crate::models::{BandPoint, ForecastRow};

/// Per-row `(timestamp, tmin, tmax)`.
pub fn observed_band(rows: &[ForecastRow]) -> Vec<BandPoint> {
    rows.iter()
        .map(|row| BandPoint {
            timestamp: row.timestamp,
            low: row.tmin,
            high: row.tmax,
        })
        .collect()
}

/// Per-row `(timestamp, tpmin, tpmax)`.
pub fn forecast_band(rows: &[ForecastRow]) -> Vec<BandPoint> {
    rows.iter()
        .map(|row| BandPoint {
            timestamp: row.timestamp,
            low: row.tpmin,
            high: row.tpmax,
        })
        .collect()
}
