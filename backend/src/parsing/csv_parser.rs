use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, warn};

use crate::models::{
    ForecastRow, ParsedForecast, RowIssue, OPTIONAL_SUNRISE_COLUMN, REQUIRED_COLUMNS,
};

/// Timestamp layouts carrying an explicit UTC offset.
const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
];

/// Layouts without an offset; interpreted in the observation timezone.
const NAIVE_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Errors that make a whole table unusable.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The table is blank or whitespace only.
    #[error("forecast table is empty")]
    EmptyInput,

    /// The reader failed on the text. Input is already valid UTF-8 and the
    /// reader is flexible about row width, so this is not expected in practice.
    #[error("malformed forecast table: {0}")]
    Malformed(String),
}

impl From<csv::Error> for ParseError {
    fn from(err: csv::Error) -> Self {
        ParseError::Malformed(err.to_string())
    }
}

/// Column positions resolved from the header row.
struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    fn from_header(header: &StringRecord) -> Self {
        let mut positions = HashMap::with_capacity(header.len());
        for (idx, name) in header.iter().enumerate() {
            let name = name.trim_start_matches('\u{feff}').trim();
            positions.entry(name.to_string()).or_insert(idx);
        }
        Self { positions }
    }

    fn missing_required(&self) -> Vec<String> {
        REQUIRED_COLUMNS
            .iter()
            .filter(|name| !self.positions.contains_key(**name))
            .map(|name| name.to_string())
            .collect()
    }

    fn cell<'r>(&self, record: &'r StringRecord, name: &str) -> Option<&'r str> {
        self.positions.get(name).and_then(|&idx| record.get(idx))
    }
}

/// Parse a raw forecast table into typed rows.
///
/// Rows whose column count differs from the header are dropped and reported
/// in [`ParsedForecast::skipped`]; every other row is emitted in table order,
/// even when its cells cannot be parsed.
///
/// # Errors
/// [`ParseError::EmptyInput`] if the trimmed text is empty.
pub fn parse_forecast_csv(raw: &str, tz: Tz) -> Result<ParsedForecast, ParseError> {
    if raw.trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(raw.as_bytes());

    let header = reader.headers()?.clone();
    let columns = ColumnIndex::from_header(&header);
    let expected = header.len();

    let missing_columns = columns.missing_required();
    if !missing_columns.is_empty() {
        warn!(
            "Forecast header is missing required columns: {}",
            missing_columns.join(", ")
        );
    }

    let mut parsed = ParsedForecast {
        missing_columns,
        ..Default::default()
    };

    for result in reader.records() {
        let record = result?;

        // Whitespace-only lines collapse to a single empty field.
        if record.len() == 1 && record.get(0).is_some_and(str::is_empty) {
            continue;
        }

        if record.len() != expected {
            let issue = RowIssue {
                line: record.position().map(|p| p.line()).unwrap_or(0),
                expected_columns: expected,
                found_columns: record.len(),
            };
            debug!("Skipping forecast row: {}", issue);
            parsed.skipped.push(issue);
            continue;
        }

        parsed.rows.push(row_from_record(&columns, &record, tz));
    }

    if !parsed.skipped.is_empty() {
        warn!(
            "Skipped {} forecast rows with a column count different from the header",
            parsed.skipped.len()
        );
    }

    Ok(parsed)
}

fn row_from_record(columns: &ColumnIndex, record: &StringRecord, tz: Tz) -> ForecastRow {
    let numeric = |name: &str| columns.cell(record, name).and_then(parse_numeric);
    let flag = |name: &str| columns.cell(record, name).is_some_and(parse_flag);

    ForecastRow {
        timestamp: columns
            .cell(record, "timestamp")
            .and_then(|cell| parse_timestamp(cell, tz)),
        tmin: numeric("tmin"),
        tmean: numeric("tmean"),
        tmax: numeric("tmax"),
        tpmin: numeric("tpmin"),
        tprophet: numeric("tprophet"),
        tpmax: numeric("tpmax"),
        trend_weekly: numeric("trend-weekly"),
        is_sunset: flag("sunset"),
        is_sunrise: flag(OPTIONAL_SUNRISE_COLUMN),
    }
}

/// Null-safe decimal parsing, rounded to one decimal place.
///
/// Returns `None` for empty cells, unparsable text and values that are not
/// finite once rounded.
pub fn parse_numeric(cell: &str) -> Option<f64> {
    cell.trim()
        .parse::<f64>()
        .ok()
        .map(round_one_decimal)
        .filter(|v| v.is_finite())
}

pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Case-insensitive match against `"true"`.
pub fn parse_flag(cell: &str) -> bool {
    cell.trim().eq_ignore_ascii_case("true")
}

/// Parse a table timestamp, keeping the offset it was written with.
///
/// Timestamps without an offset are interpreted in `tz`; an ambiguous local
/// time resolves to its earliest instant. Returns `None` for anything that
/// cannot be read as an instant.
pub fn parse_timestamp(cell: &str, tz: Tz) -> Option<DateTime<FixedOffset>> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(cell) {
        return Some(ts);
    }

    if let Some(ts) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(cell, fmt).ok())
    {
        return Some(ts);
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(cell, fmt).ok())
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
        .map(|ts| ts.fixed_offset())
}
