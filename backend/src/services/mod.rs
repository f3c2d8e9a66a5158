//! Derivation layer: turns parsed forecast rows into the series, markers and
//! scalar values shown on the dashboard.
//!
//! Every function here is pure. The current time and the observation
//! settings are passed in, so results are reproducible in tests.

pub mod bands;
pub mod freshness;
pub mod nights;
pub mod summary;
pub mod twilight;


pub use bands::{forecast_band, observed_band};
pub use freshness::evaluate_freshness;
pub use nights::{night_duration, night_intervals, sunrises, sunsets, FALLBACK_NIGHT_HOURS};
pub use summary::{build_summary, derive_series};
pub use twilight::{
    civil_evening, nearest_row_index, time_to_twilight, twilight_instant, twilight_values,
};
