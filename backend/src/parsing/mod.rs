//! Parsers for the forecast table format.
//!
//! The forecasting job emits a comma-separated table with a header row. Column
//! order is not fixed; names are authoritative.
//!
//! # Example
//!
//! ```
//! use twilight_forecast::parsing::parse_forecast_csv;
//!
//! let raw = "timestamp,tmin,tmean,tmax,tpmin,tprophet,tpmax,trend-weekly,sunset\n\
//!            2025-08-05T18:00:00-04:00,1.0,2.0,3.0,1.5,2.5,3.5,2.2,true\n";
//! let parsed = parse_forecast_csv(raw, chrono_tz::America::Santiago).unwrap();
//! assert_eq!(parsed.rows.len(), 1);
//! assert!(parsed.rows[0].is_sunset);
//! ```

pub mod csv_parser;

#[cfg(test)]
mod csv_parser_tests;

pub use csv_parser::{parse_flag, parse_forecast_csv, parse_numeric, parse_timestamp, ParseError};
