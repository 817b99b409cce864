use sqlx::migrate::Migrator;
use sqlx::mysql::{MySqlPoolOptions, MySqlQueryResult};
use sqlx::{MySql, MySqlPool};

use super::sql::Dialect;
use super::store_impl::impl_result_store;
use crate::error::Result;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations/mysql");

/// MySQL-backed store.
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        Ok(Self { pool })
    }
}

fn reported_person_id(done: &MySqlQueryResult) -> Option<i64> {
    // ON DUPLICATE KEY UPDATE reports 1 affected row for an insert and 2 (or
    // 0 when nothing changed) for an update, and on the update branch
    // LAST_INSERT_ID() can hold a freshly burnt auto-increment value.
    if done.rows_affected() != 1 {
        return None;
    }
    i64::try_from(done.last_insert_id()).ok().filter(|id| *id > 0)
}

impl_result_store!(MySqlStore, MySql, Dialect::MySql);
