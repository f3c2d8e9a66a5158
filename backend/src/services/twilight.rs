//! Values aligned to the twilight instant.
//!
//! The twilight instant is the last sunset marker in the table. Without one
//! it is the civil evening hour on today's local date in the observation
//! timezone.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::config::ObservationSettings;
use crate::models::{ForecastRow, TimeToTwilight, TwilightSource, TwilightValues};
use crate::parsing::csv_parser::round_one_decimal;

/// Resolve the twilight instant for `rows` at time `now`.
pub fn twilight_instant(
    rows: &[ForecastRow],
    settings: &ObservationSettings,
    now: DateTime<Utc>,
) -> (DateTime<Utc>, TwilightSource) {
    let last_sunset = rows
        .iter()
        .filter(|row| row.is_sunset)
        .filter_map(ForecastRow::instant)
        .last();

    if let Some(sunset) = last_sunset {
        return (sunset, TwilightSource::LastSunset);
    }

    match civil_evening(settings.timezone, settings.evening_hour, now) {
        Some(evening) => (evening, TwilightSource::CivilEvening),
        None => (now, TwilightSource::Now),
    }
}

/// `hour:00` local time in `tz` on the local date of `now`.
///
/// An ambiguous local time resolves to its earliest instant. `None` when the
/// local time does not exist on that date.
pub fn civil_evening(tz: Tz, hour: u32, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let local_date = now.with_timezone(&tz).date_naive();
    let evening = NaiveTime::from_hms_opt(hour, 0, 0)?;
    tz.from_local_datetime(&local_date.and_time(evening))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Index of the row whose timestamp is closest to `target`.
///
/// Rows with an invalid timestamp are skipped; on a tie the earlier index
/// wins. `None` when no row has a valid timestamp.
pub fn nearest_row_index(rows: &[ForecastRow], target: DateTime<Utc>) -> Option<usize> {
    let mut best: Option<(usize, i64)> = None;

    for (index, row) in rows.iter().enumerate() {
        let Some(instant) = row.instant() else {
            continue;
        };
        let distance = (instant - target).num_milliseconds().abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((index, distance)),
        }
    }

    best.map(|(index, _)| index)
}

/// `tpmax - tpmin` when both are present and the spread is positive.
fn uncertainty(row: &ForecastRow) -> Option<f64> {
    let spread = row.tpmax? - row.tpmin?;
    (spread.is_finite() && spread > 0.0).then(|| round_one_decimal(spread))
}

/// Forecast, observed and uncertainty values at the row nearest to twilight.
pub fn twilight_values(
    rows: &[ForecastRow],
    settings: &ObservationSettings,
    now: DateTime<Utc>,
) -> TwilightValues {
    let (instant, source) = twilight_instant(rows, settings, now);
    let row_index = nearest_row_index(rows, instant);
    let row = row_index.and_then(|i| rows.get(i));

    TwilightValues {
        instant,
        source,
        row_index,
        forecast: row.and_then(|r| r.tprophet),
        observed: row.and_then(|r| r.tmean),
        uncertainty: row.and_then(uncertainty),
    }
}

/// Whole hours and minutes until `twilight`, or whole minutes since it.
pub fn time_to_twilight(twilight: DateTime<Utc>, now: DateTime<Utc>) -> TimeToTwilight {
    let remaining = twilight - now;
    if remaining < Duration::zero() {
        TimeToTwilight::Passed {
            elapsed_minutes: (now - twilight).num_minutes(),
        }
    } else {
        TimeToTwilight::Remaining {
            hours: remaining.num_hours(),
            minutes: remaining.num_minutes() % 60,
        }
    }
}
