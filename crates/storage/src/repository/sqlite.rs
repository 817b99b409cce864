use std::str::FromStr;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteQueryResult};
use sqlx::{Sqlite, SqlitePool};

use super::sql::Dialect;
use super::store_impl::impl_result_store;
use crate::error::Result;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations/sqlite");

/// SQLite-backed store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// A private in-memory database. The pool is pinned to one connection
    /// that is never recycled, since the data lives only as long as it does.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn reported_person_id(done: &SqliteQueryResult) -> Option<i64> {
    // Left untouched by the update branch, so it may belong to an earlier row.
    // Only consulted for stable ids missing from the pre-fetched map.
    Some(done.last_insert_rowid()).filter(|id| *id > 0)
}

impl_result_store!(SqliteStore, Sqlite, Dialect::Sqlite);
