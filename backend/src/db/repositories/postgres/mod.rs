//! Postgres repository implementation using Diesel.
//!
//! The snapshot lives in a single row of `forecast_snapshot` keyed by a fixed
//! slot. An upload is one `INSERT ... ON CONFLICT DO UPDATE`, so the raw table
//! and its ingestion time change together.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)

use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel::upsert::excluded;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::Duration;
use tokio::task;

use crate::db::repository::{
    ErrorContext, RepositoryError, RepositoryResult, SnapshotRepository,
};
use crate::models::Snapshot;

mod models;
mod schema;

use models::*;
use schema::forecast_snapshot;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Key of the only row in `forecast_snapshot`.
const LATEST_SLOT: i32 = 1;

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();

        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size)?,
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size)?,
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec)?,
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec)?,
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Read a numeric pool setting; unset means `default`, unparsable is an error.
fn env_or<T>(key: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    parse_setting(key, std::env::var(key).ok(), default)
}

fn parse_setting<T>(key: &str, raw: Option<String>, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| format!("{} has an invalid value '{}': {}", key, value, e)),
        None => Ok(default),
    }
}

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    ///
    /// # Errors
    /// `StorageUnavailable` if the pool cannot be built or no connection can
    /// be obtained; `InternalError` if a migration fails.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::unavailable_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_backend("postgres")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::unavailable_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations").with_backend("postgres"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self { pool })
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations").with_backend("postgres"),
            )
        })?;
        Ok(())
    }

    /// Run a blocking database operation on the blocking thread pool.
    ///
    /// A failure is returned to the caller immediately; there is no retry.
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();

        task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::unavailable_with_context(
                    e.to_string(),
                    ErrorContext::new(operation).with_backend("postgres"),
                )
            })?;

            f(&mut conn).map_err(|e| e.with_operation(operation).with_backend("postgres"))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }
}

#[async_trait]
impl SnapshotRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn("health_check", |conn| {
            sql_query("SELECT 1").execute(conn)?;
            Ok(true)
        })
        .await
    }

    async fn put_snapshot(&self, snapshot: &Snapshot) -> RepositoryResult<()> {
        let row = NewSnapshotRow {
            slot: LATEST_SLOT,
            raw_table: snapshot.raw.clone(),
            ingested_at: snapshot.ingested_at,
            updated_at: Utc::now(),
        };

        self.with_conn("put_snapshot", move |conn| {
            diesel::insert_into(forecast_snapshot::table)
                .values(&row)
                .on_conflict(forecast_snapshot::slot)
                .do_update()
                .set((
                    forecast_snapshot::raw_table.eq(excluded(forecast_snapshot::raw_table)),
                    forecast_snapshot::ingested_at.eq(excluded(forecast_snapshot::ingested_at)),
                    forecast_snapshot::updated_at.eq(excluded(forecast_snapshot::updated_at)),
                ))
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn get_snapshot(&self) -> RepositoryResult<Option<Snapshot>> {
        self.with_conn("get_snapshot", |conn| {
            let row: Option<SnapshotRow> = forecast_snapshot::table
                .filter(forecast_snapshot::slot.eq(LATEST_SLOT))
                .select(SnapshotRow::as_select())
                .first(conn)
                .optional()?;
            Ok(row.map(Snapshot::from))
        })
        .await
    }

    async fn get_ingested_at(&self) -> RepositoryResult<Option<chrono::DateTime<Utc>>> {
        self.with_conn("get_ingested_at", |conn| {
            let ingested_at: Option<chrono::DateTime<Utc>> = forecast_snapshot::table
                .filter(forecast_snapshot::slot.eq(LATEST_SLOT))
                .select(forecast_snapshot::ingested_at)
                .first(conn)
                .optional()?;
            Ok(ingested_at)
        })
        .await
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
