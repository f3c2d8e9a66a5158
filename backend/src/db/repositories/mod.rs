//! Repository implementations module.
//!
//! This module contains the implementations of the `SnapshotRepository` trait:
//! - `local`: In-memory implementation for unit testing and local development
//! - `file`: JSON document on local disk, replaced atomically on each upload
//! - `postgres`: PostgreSQL implementation with Diesel ORM
pub mod file;
pub mod local;
#[cfg(feature = "postgres-repo")]
pub mod postgres;

pub use file::FileRepository;
pub use local::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use postgres::{PostgresConfig, PostgresRepository};
