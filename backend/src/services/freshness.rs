//! Staleness of the uploaded feed.
//!
//! Advisory only: a stale feed is still served and derived as usual.

use chrono::{DateTime, Utc};

use crate::models::{ForecastRow, Freshness};

/// Evaluate how old the latest observation in `rows` is at `now`.
///
/// The last-observed row is the latest valid timestamp not after `now`
/// (earliest index on ties). If every timestamp lies in the future, the
/// first row with a valid timestamp is used. Elapsed time is the absolute
/// distance in whole minutes; the feed is stale once it exceeds
/// `stale_after_minutes`.
pub fn evaluate_freshness(
    rows: &[ForecastRow],
    now: DateTime<Utc>,
    stale_after_minutes: i64,
) -> Freshness {
    let mut latest_past: Option<&ForecastRow> = None;
    for row in rows {
        let Some(instant) = row.instant() else {
            continue;
        };
        if instant > now {
            continue;
        }
        match latest_past.and_then(ForecastRow::instant) {
            Some(best) if instant <= best => {}
            _ => latest_past = Some(row),
        }
    }

    let last_observed = latest_past
        .or_else(|| rows.iter().find(|row| row.timestamp.is_some()))
        .and_then(|row| row.timestamp);

    match last_observed {
        Some(ts) => {
            let elapsed = (now - ts.with_timezone(&Utc)).num_minutes().unsigned_abs();
            Freshness {
                last_observed: Some(ts),
                elapsed_minutes: Some(elapsed),
                stale: (elapsed as i64) > stale_after_minutes,
            }
        }
        None => Freshness {
            last_observed: None,
            elapsed_minutes: None,
            stale: false,
        },
    }
}
