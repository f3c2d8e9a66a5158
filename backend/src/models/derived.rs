//! Presentation-ready values derived from the forecast rows.
//!
//! Everything here is recomputed on each retrieval and never persisted.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use super::forecast::RowIssue;

/// A `(timestamp, low, high)` triple used to shade the range between two series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandPoint {
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub low: Option<f64>,
    pub high: Option<f64>,
}

/// Half-open darkness range `[start, end)` overlaid on the plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightInterval {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

/// Where the twilight instant came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TwilightSource {
    /// Last sunset marker in the table
    LastSunset,
    /// Civil evening hour in the observation timezone
    CivilEvening,
    /// Civil evening could not be resolved locally; current time used
    Now,
}

/// Values read from the row closest to the twilight instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwilightValues {
    pub instant: DateTime<Utc>,
    pub source: TwilightSource,
    /// Index of the nearest row, `None` when no row has a valid timestamp
    pub row_index: Option<usize>,
    /// Forecast (`tprophet`) at the nearest row
    pub forecast: Option<f64>,
    /// Observed mean (`tmean`) at the nearest row
    pub observed: Option<f64>,
    /// `tpmax - tpmin`, only when positive and finite
    pub uncertainty: Option<f64>,
}

/// Time left until the twilight instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TimeToTwilight {
    Remaining { hours: i64, minutes: i64 },
    Passed { elapsed_minutes: i64 },
}

/// How old the latest observation in the feed is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Freshness {
    pub last_observed: Option<DateTime<FixedOffset>>,
    pub elapsed_minutes: Option<u64>,
    pub stale: bool,
}

/// All series the dashboard needs, computed from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedSeries {
    pub observed_band: Vec<BandPoint>,
    pub forecast_band: Vec<BandPoint>,
    pub sunsets: Vec<DateTime<FixedOffset>>,
    pub sunrises: Vec<DateTime<FixedOffset>>,
    pub night_duration_minutes: i64,
    pub nights: Vec<NightInterval>,
    pub twilight: TwilightValues,
    pub time_to_twilight: TimeToTwilight,
}

/// Server-side rendition of everything derived from the current snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub ingested_at: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
    pub row_count: usize,
    pub skipped_rows: Vec<RowIssue>,
    pub missing_columns: Vec<String>,
    pub series: DerivedSeries,
    pub freshness: Freshness,
}
