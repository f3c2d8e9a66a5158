//! # Twilight Forecast Service
//!
//! Republishes the periodically produced temperature-forecast table (observed
//! tower readings plus a statistical forecast) over HTTP and derives the
//! presentation-ready quantities the dashboard plots.
//!
//! ## Architecture
//!
//! - [`parsing`]: raw CSV table to typed [`models::ForecastRow`]s
//! - [`db`]: single-slot snapshot store behind the repository pattern
//! - [`services`]: bands, night intervals, twilight values and feed freshness
//! - [`http`]: Axum-based HTTP server and request handlers
//! - [`config`]: environment-driven service settings
//!
//! ## Data flow
//!
//! ```text
//! producer ──PUT /forecast──▶ http ──▶ db (single slot)
//!                                        │
//! dashboard ◀──GET /forecast*── http ◀───┘
//!                                 │
//!                                 └──▶ parsing ──▶ services (derived series)
//! ```

// RepositoryError carries a structured context in every variant
#![allow(clippy::result_large_err)]

pub mod config;
pub mod db;
pub mod models;
pub mod parsing;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
