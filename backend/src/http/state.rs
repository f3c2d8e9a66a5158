//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::db::repository::SnapshotRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Snapshot store shared by every request
    pub repository: Arc<dyn SnapshotRepository>,
    /// Immutable service configuration
    pub config: Arc<ServiceConfig>,
}

impl AppState {
    /// Create a new application state with the given repository and default
    /// configuration.
    pub fn new(repository: Arc<dyn SnapshotRepository>) -> Self {
        Self::with_config(repository, ServiceConfig::default())
    }

    /// Create a new application state with an explicit configuration.
    pub fn with_config(repository: Arc<dyn SnapshotRepository>, config: ServiceConfig) -> Self {
        Self {
            repository,
            config: Arc::new(config),
        }
    }
}
