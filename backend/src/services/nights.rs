//! Sunset/sunrise markers and the night intervals drawn from them.

use chrono::{DateTime, Duration, FixedOffset};

use crate::models::{ForecastRow, NightInterval};

/// Night length used when the markers cannot give a sensible day length.
pub const FALLBACK_NIGHT_HOURS: i64 = 12;

/// Timestamps of rows flagged as sunset, in row order. Rows with an invalid
/// timestamp are skipped.
pub fn sunsets(rows: &[ForecastRow]) -> Vec<DateTime<FixedOffset>> {
    rows.iter()
        .filter(|row| row.is_sunset)
        .filter_map(|row| row.timestamp)
        .collect()
}

/// Timestamps of rows flagged as sunrise, in row order.
pub fn sunrises(rows: &[ForecastRow]) -> Vec<DateTime<FixedOffset>> {
    rows.iter()
        .filter(|row| row.is_sunrise)
        .filter_map(|row| row.timestamp)
        .collect()
}

/// Length of every night interval.
///
/// The day length is `last sunset - last sunrise`. When it lies strictly
/// between zero and 24 hours the night is the rest of the day; otherwise,
/// and whenever either list is empty, it is [`FALLBACK_NIGHT_HOURS`].
pub fn night_duration(
    sunsets: &[DateTime<FixedOffset>],
    sunrises: &[DateTime<FixedOffset>],
) -> Duration {
    let full_day = Duration::hours(24);
    let fallback = Duration::hours(FALLBACK_NIGHT_HOURS);

    match (sunsets.last(), sunrises.last()) {
        (Some(sunset), Some(sunrise)) => {
            let day = *sunset - *sunrise;
            if day > Duration::zero() && day < full_day {
                full_day - day
            } else {
                fallback
            }
        }
        _ => fallback,
    }
}

/// One `[sunset, sunset + duration)` interval per sunset.
pub fn night_intervals(
    sunsets: &[DateTime<FixedOffset>],
    duration: Duration,
) -> Vec<NightInterval> {
    sunsets
        .iter()
        .map(|&start| NightInterval {
            start,
            end: start + duration,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn marker(at: &str, sunset: bool, sunrise: bool) -> ForecastRow {
        let mut row = ForecastRow::at(ts(at));
        row.is_sunset = sunset;
        row.is_sunrise = sunrise;
        row
    }

    #[test]
    fn test_no_sunrise_falls_back_to_twelve_hours() {
        let rows = vec![
            marker("2025-08-04T18:10:00-04:00", true, false),
            marker("2025-08-05T18:11:00-04:00", true, false),
        ];
        let sunsets = sunsets(&rows);
        let sunrises = sunrises(&rows);
        assert!(sunrises.is_empty());

        let duration = night_duration(&sunsets, &sunrises);
        assert_eq!(duration, Duration::hours(12));

        let nights = night_intervals(&sunsets, duration);
        assert_eq!(nights.len(), 2);
        assert_eq!(nights[0].end, ts("2025-08-05T06:10:00-04:00"));
        assert_eq!(nights[1].end, ts("2025-08-06T06:11:00-04:00"));
    }

    #[test]
    fn test_duration_from_last_sunrise_and_sunset() {
        let rows = vec![
            marker("2025-08-05T07:50:00-04:00", false, true),
            marker("2025-08-05T18:20:00-04:00", true, false),
        ];
        let duration = night_duration(&sunsets(&rows), &sunrises(&rows));
        // 10h30m of daylight
        assert_eq!(duration, Duration::minutes(13 * 60 + 30));
    }

    #[test]
    fn test_sunrise_after_sunset_uses_fallback() {
        let rows = vec![
            marker("2025-08-05T18:20:00-04:00", true, false),
            marker("2025-08-06T07:49:00-04:00", false, true),
        ];
        let duration = night_duration(&sunsets(&rows), &sunrises(&rows));
        assert_eq!(duration, Duration::hours(FALLBACK_NIGHT_HOURS));
    }

    #[test]
    fn test_day_of_24_hours_or_more_uses_fallback() {
        let rows = vec![
            marker("2025-08-04T07:50:00-04:00", false, true),
            marker("2025-08-05T18:20:00-04:00", true, false),
        ];
        let duration = night_duration(&sunsets(&rows), &sunrises(&rows));
        assert_eq!(duration, Duration::hours(FALLBACK_NIGHT_HOURS));
    }

    #[test]
    fn test_markers_without_timestamp_are_ignored() {
        let mut row = marker("2025-08-05T18:20:00-04:00", true, true);
        row.timestamp = None;
        assert!(sunsets(&[row.clone()]).is_empty());
        assert!(sunrises(&[row]).is_empty());
    }
}
