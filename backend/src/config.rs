//! Service configuration and environment variable handling.

use std::env;
use std::str::FromStr;

use chrono_tz::Tz;

/// Default observation timezone of the summit tower.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Santiago;

/// Default civil evening hour used when the table carries no sunset marker.
pub const DEFAULT_EVENING_HOUR: u32 = 18;

/// Minutes after which the feed is flagged as stale.
pub const DEFAULT_STALE_AFTER_MINUTES: i64 = 30;

/// Default upload body limit (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value '{value}': {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings that drive derivation of twilight and freshness values.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSettings {
    /// Timezone naive table timestamps and the civil evening are expressed in
    pub timezone: Tz,
    /// Local hour of the civil-evening fallback for the twilight instant
    pub evening_hour: u32,
    /// Freshness threshold in minutes
    pub stale_after_minutes: i64,
}

impl Default for ObservationSettings {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE,
            evening_hour: DEFAULT_EVENING_HOUR,
            stale_after_minutes: DEFAULT_STALE_AFTER_MINUTES,
        }
    }
}

/// Complete service configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: usize,
    /// Derivation settings
    pub observation: ObservationSettings,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            observation: ObservationSettings::default(),
        }
    }
}

impl ServiceConfig {
    /// Create a configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `HOST` (default: 0.0.0.0)
    /// - `PORT` (default: 8080)
    /// - `FORECAST_MAX_UPLOAD_BYTES` (default: 10 MiB)
    /// - `FORECAST_TIMEZONE` (default: America/Santiago)
    /// - `FORECAST_EVENING_HOUR` (default: 18, must be 0-23)
    /// - `FORECAST_STALE_MINUTES` (default: 30)
    ///
    /// # Errors
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = env::var("HOST").unwrap_or(defaults.host);
        let port = parse_env("PORT", defaults.port)?;
        let max_upload_bytes = parse_env("FORECAST_MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?;

        let timezone = match env::var("FORECAST_TIMEZONE") {
            Ok(value) => value
                .trim()
                .parse::<Tz>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: "FORECAST_TIMEZONE",
                    value: value.clone(),
                    reason: e.to_string(),
                })?,
            Err(_) => DEFAULT_TIMEZONE,
        };

        let evening_hour = parse_env("FORECAST_EVENING_HOUR", DEFAULT_EVENING_HOUR)?;
        if evening_hour > 23 {
            return Err(ConfigError::InvalidValue {
                key: "FORECAST_EVENING_HOUR",
                value: evening_hour.to_string(),
                reason: "hour must be between 0 and 23".to_string(),
            });
        }

        let stale_after_minutes = parse_env("FORECAST_STALE_MINUTES", DEFAULT_STALE_AFTER_MINUTES)?;

        Ok(Self {
            host,
            port,
            max_upload_bytes,
            observation: ObservationSettings {
                timezone,
                evening_hour,
                stale_after_minutes,
            },
        })
    }

    /// Socket address string the server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_env<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue {
                key,
                value: value.clone(),
                reason: e.to_string(),
            }),
        Err(_) => Ok(default),
    }
}
