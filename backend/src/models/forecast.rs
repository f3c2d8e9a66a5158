//! Typed rows of the forecast table.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Columns every forecast table is expected to carry.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "timestamp",
    "tmin",
    "tmean",
    "tmax",
    "tpmin",
    "tprophet",
    "tpmax",
    "trend-weekly",
    "sunset",
];

/// Column added in later table versions; defaults to `false` when absent.
pub const OPTIONAL_SUNRISE_COLUMN: &str = "sunrise";

/// One sample of the forecast table.
///
/// Numeric fields are `None` when the cell could not be parsed. `timestamp`
/// is `None` for an invalid instant; such rows are kept so that index
/// alignment with the raw table is preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRow {
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub tmin: Option<f64>,
    pub tmean: Option<f64>,
    pub tmax: Option<f64>,
    pub tpmin: Option<f64>,
    pub tprophet: Option<f64>,
    pub tpmax: Option<f64>,
    pub trend_weekly: Option<f64>,
    pub is_sunset: bool,
    pub is_sunrise: bool,
}

impl ForecastRow {
    /// Row with a timestamp and every other field absent.
    pub fn at(timestamp: DateTime<FixedOffset>) -> Self {
        Self {
            timestamp: Some(timestamp),
            tmin: None,
            tmean: None,
            tmax: None,
            tpmin: None,
            tprophet: None,
            tpmax: None,
            trend_weekly: None,
            is_sunset: false,
            is_sunrise: false,
        }
    }

    /// The row's timestamp as a UTC instant, if valid.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.timestamp.map(|ts| ts.with_timezone(&Utc))
    }
}

/// A data row dropped because its shape did not match the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowIssue {
    /// 1-based line number in the raw table
    pub line: u64,
    pub expected_columns: usize,
    pub found_columns: usize,
}

impl std::fmt::Display for RowIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}: expected {} columns, found {}",
            self.line, self.expected_columns, self.found_columns
        )
    }
}

/// Result of parsing a raw forecast table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedForecast {
    /// Rows in table order
    pub rows: Vec<ForecastRow>,
    /// Rows excluded because of a column-count mismatch
    pub skipped: Vec<RowIssue>,
    /// Required columns absent from the header
    pub missing_columns: Vec<String>,
}

impl ParsedForecast {
    /// Whether every data row was kept and the header was complete.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.missing_columns.is_empty()
    }
}
