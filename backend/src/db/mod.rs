//! Storage module for the forecast snapshot.
//!
//! This module provides abstractions for snapshot storage via the Repository
//! pattern, allowing different storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP handlers (crate::http)                            │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! │  - Snapshot metadata (size, checksum)                   │
//! │  - Logging                                              │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository/) - Abstract Interface    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┼──────────────────┐
//!     │               │                  │
//! ┌───▼──────┐  ┌─────▼──────┐  ┌────────▼─────────┐
//! │ Local    │  │ File       │  │ Postgres         │
//! │ (memory) │  │ (JSON doc) │  │ (Diesel, r2d2)   │
//! └──────────┘  └────────────┘  └──────────────────┘
//! ```
//!
//! The repository is created once at start-up by [`RepositoryFactory`] and
//! handed to the HTTP state as an `Arc<dyn SnapshotRepository>`.
//!
//! ```ignore
//! use twilight_forecast::db::{services, RepositoryFactory};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = RepositoryFactory::from_env().await?;
//!     let latest = services::latest_snapshot(repo.as_ref()).await?;
//!     Ok(())
//! }
//! ```

pub mod checksum;
pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

// Postgres config is colocated with the repository implementation.
#[cfg(feature = "postgres-repo")]
pub use repositories::postgres::PostgresConfig;
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    _private: (),
}

pub use checksum::calculate_checksum;
pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::{FileRepository, LocalRepository};
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{ErrorContext, RepositoryError, RepositoryResult, SnapshotRepository};
pub use services::{health_check, latest_snapshot, snapshot_timestamp, store_snapshot};
