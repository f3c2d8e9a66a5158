//! Full derivation of a snapshot into dashboard-ready series.

use chrono::{DateTime, Utc};
use log::debug;

use super::bands::{forecast_band, observed_band};
use super::freshness::evaluate_freshness;
use super::nights::{night_duration, night_intervals, sunrises, sunsets};
use super::twilight::{time_to_twilight, twilight_values};
use crate::config::ObservationSettings;
use crate::models::{DerivedSeries, ForecastRow, ForecastSummary, Snapshot};
use crate::parsing::{parse_forecast_csv, ParseError};

/// Compute every derived series from parsed rows at time `now`.
pub fn derive_series(
    rows: &[ForecastRow],
    settings: &ObservationSettings,
    now: DateTime<Utc>,
) -> DerivedSeries {
    let sunsets = sunsets(rows);
    let sunrises = sunrises(rows);
    let duration = night_duration(&sunsets, &sunrises);
    let nights = night_intervals(&sunsets, duration);
    let twilight = twilight_values(rows, settings, now);
    let time_to_twilight = time_to_twilight(twilight.instant, now);

    DerivedSeries {
        observed_band: observed_band(rows),
        forecast_band: forecast_band(rows),
        sunsets,
        sunrises,
        night_duration_minutes: duration.num_minutes(),
        nights,
        twilight,
        time_to_twilight,
    }
}

/// Parse `snapshot` and derive its summary at time `now`.
///
/// # Errors
/// [`ParseError::EmptyInput`] when the stored table is blank.
pub fn build_summary(
    snapshot: &Snapshot,
    settings: &ObservationSettings,
    now: DateTime<Utc>,
) -> Result<ForecastSummary, ParseError> {
    let parsed = parse_forecast_csv(&snapshot.raw, settings.timezone)?;
    let series = derive_series(&parsed.rows, settings, now);
    let freshness = evaluate_freshness(&parsed.rows, now, settings.stale_after_minutes);

    debug!(
        "Derived summary: {} rows, {} skipped, {} nights, stale={}",
        parsed.rows.len(),
        parsed.skipped.len(),
        series.nights.len(),
        freshness.stale
    );

    Ok(ForecastSummary {
        ingested_at: snapshot.ingested_at,
        generated_at: now,
        row_count: parsed.rows.len(),
        skipped_rows: parsed.skipped,
        missing_columns: parsed.missing_columns,
        series,
        freshness,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TimeToTwilight, TwilightSource};
    use chrono::TimeZone;

    const TABLE: &str = "\
timestamp,tmin,tmean,tmax,tpmin,tprophet,tpmax,trend-weekly,sunset,sunrise
2025-08-05T07:00:00-04:00,2.0,3.0,4.0,1.5,3.1,4.6,0.1,false,false
2025-08-05T08:00:00-04:00,2.5,3.5,4.5,2.0,3.6,5.1,0.1,false,true
2025-08-05T18:00:00-04:00,8.0,9.0,10.0,7.0,9.2,11.4,0.2,true,false
2025-08-05T19:00:00-04:00,7.0,8.0,9.0,6.0,8.1,10.3,0.2,false,false
";

    #[test]
    fn test_summary_of_well_formed_table() {
        let ingested = Utc.with_ymd_and_hms(2025, 8, 5, 23, 5, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 8, 5, 23, 10, 0).unwrap();
        let snapshot = Snapshot::new(TABLE, ingested);

        let summary = build_summary(&snapshot, &ObservationSettings::default(), now).unwrap();

        assert_eq!(summary.row_count, 4);
        assert!(summary.skipped_rows.is_empty());
        assert!(summary.missing_columns.is_empty());
        assert_eq!(summary.ingested_at, ingested);

        let series = &summary.series;
        assert_eq!(series.observed_band.len(), 4);
        assert_eq!(series.sunsets.len(), 1);
        assert_eq!(series.sunrises.len(), 1);
        // 10h of daylight between 08:00 and 18:00
        assert_eq!(series.night_duration_minutes, 14 * 60);
        assert_eq!(series.nights.len(), 1);

        assert_eq!(series.twilight.source, TwilightSource::LastSunset);
        assert_eq!(series.twilight.row_index, Some(2));
        assert_eq!(series.twilight.forecast, Some(9.2));
        assert_eq!(series.twilight.observed, Some(9.0));
        assert_eq!(series.twilight.uncertainty, Some(4.4));
        assert_eq!(
            series.time_to_twilight,
            TimeToTwilight::Passed {
                elapsed_minutes: 70
            }
        );

        // 19:00 local is 23:00 UTC
        assert_eq!(summary.freshness.elapsed_minutes, Some(10));
        assert!(!summary.freshness.stale);
    }

    #[test]
    fn test_blank_snapshot_is_empty_input() {
        let snapshot = Snapshot::new("  \n", Utc::now());
        let err = build_summary(&snapshot, &ObservationSettings::default(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, ParseError::EmptyInput));
    }

    #[test]
    fn test_derive_series_of_no_rows() {
        let now = Utc.with_ymd_and_hms(2025, 8, 5, 15, 0, 0).unwrap();
        let series = derive_series(&[], &ObservationSettings::default(), now);

        assert!(series.observed_band.is_empty());
        assert!(series.nights.is_empty());
        assert_eq!(series.night_duration_minutes, 12 * 60);
        assert_eq!(series.twilight.source, TwilightSource::CivilEvening);
        assert_eq!(series.twilight.row_index, None);
        assert_eq!(series.twilight.forecast, None);
        assert_eq!(
            series.time_to_twilight,
            TimeToTwilight::Remaining {
                hours: 7,
                minutes: 0
            }
        );
    }
}
