//! Storage for race timing results: participants (`person`) and the timing
//! reads attached to them (`result`), on MySQL or SQLite.

use std::sync::Arc;

use tracing::info;

pub mod config;
pub mod dto;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::{StoreConfig, Timeouts};
pub use error::{Result, StorageError};
pub use repository::{Dialect, MySqlStore, ResultStore, SqliteStore};

/// Process-wide handle on one store and its connection pool.
///
/// Cheap to clone; clones share the pool. The ingestion, retrieval and
/// deletion operations live in [`services`] and wrap the store calls with
/// input validation, timeouts and logging.
#[derive(Clone)]
pub struct Database {
    store: Arc<dyn ResultStore>,
    timeouts: Timeouts,
}

impl Database {
    pub async fn new(config: &StoreConfig) -> Result<Self> {
        let dialect = config.dialect()?;
        info!(
            "Connecting to {} store at {}",
            dialect.name(),
            config::redact(&config.database_url)
        );

        let store: Arc<dyn ResultStore> = match dialect {
            Dialect::MySql => {
                Arc::new(MySqlStore::connect(&config.database_url, config.max_connections).await?)
            }
            Dialect::Sqlite => {
                Arc::new(SqliteStore::connect(&config.database_url, config.max_connections).await?)
            }
        };

        Ok(Self::with_store(store, config.timeouts))
    }

    /// Fresh, migrated in-memory SQLite database.
    pub async fn in_memory() -> Result<Self> {
        let db = Self::with_store(Arc::new(SqliteStore::in_memory().await?), Timeouts::default());
        db.run_migrations().await?;
        Ok(db)
    }

    pub fn with_store(store: Arc<dyn ResultStore>, timeouts: Timeouts) -> Self {
        Self { store, timeouts }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        self.store.run_migrations().await
    }

    pub async fn health_check(&self) -> Result<()> {
        services::timed(
            "health check",
            self.timeouts.operation,
            self.store.health_check(),
        )
        .await
    }

    pub fn dialect(&self) -> Dialect {
        self.store.dialect()
    }

    pub fn store(&self) -> &dyn ResultStore {
        self.store.as_ref()
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }
}
