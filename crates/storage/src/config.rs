use std::time::Duration;

use crate::error::{Result, StorageError};
use crate::repository::Dialect;

/// Connection settings for a [`crate::Database`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub timeouts: Timeouts,
}

/// Upper bounds on how long one operation may hold its transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Single-row reads and small writes.
    pub operation: Duration,
    /// Batch ingestion and bulk deletion.
    pub batch: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            operation: Duration::from_secs(5),
            batch: Duration::from_secs(15),
        }
    }
}

impl StoreConfig {
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: Self::DEFAULT_MAX_CONNECTIONS,
            timeouts: Timeouts::default(),
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Picks the backend from the URL scheme.
    pub fn dialect(&self) -> Result<Dialect> {
        let url = self.database_url.trim();
        if url.starts_with("mysql:") || url.starts_with("mariadb:") {
            Ok(Dialect::MySql)
        } else if url.starts_with("sqlite:") {
            Ok(Dialect::Sqlite)
        } else {
            Err(StorageError::Config(format!(
                "unsupported database url '{}': expected mysql://, mariadb:// or sqlite:",
                redact(url)
            )))
        }
    }
}

/// Strips credentials so a URL can be logged or shown in errors.
pub fn redact(url: &str) -> &str {
    url.split('@').next_back().unwrap_or(url)
}
