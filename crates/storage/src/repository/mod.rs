//! Backend-neutral store interface and its MySQL and SQLite implementations.

use async_trait::async_trait;

use crate::dto::{ResultKey, ResultQuery};
use crate::error::Result;
use crate::models::{Person, TimingRow};

pub mod mysql;
mod person_ids;
pub mod sql;
pub mod sqlite;
mod store_impl;

pub use mysql::MySqlStore;
pub use sql::Dialect;
pub use sqlite::SqliteStore;

/// Transactional access to the `person` and `result` tables.
///
/// Every method runs in its own connection checkout; the write methods run in
/// a single transaction that is rolled back on any error, including the
/// future being dropped part way through.
#[async_trait]
pub trait ResultStore: Send + Sync {
    fn dialect(&self) -> Dialect;

    async fn run_migrations(&self) -> Result<()>;

    async fn health_check(&self) -> Result<()>;

    /// Upserts every row's Person and Result, all or nothing.
    ///
    /// Person ids are resolved from a map of the event-year's existing
    /// participants taken at the start of the transaction. The id reported by
    /// the driver is only trusted for participants missing from that map,
    /// because on the update branch of an upsert neither backend reports the
    /// id of the row it touched.
    async fn ingest_results(&self, event_year_id: i64, rows: &[TimingRow]) -> Result<Vec<TimingRow>>;

    async fn get_results(&self, event_year_id: i64, query: &ResultQuery) -> Result<Vec<TimingRow>>;

    async fn get_bib_results(&self, event_year_id: i64, bib: &str) -> Result<Vec<TimingRow>>;

    async fn get_result(&self, event_year_id: i64, key: &ResultKey) -> Result<Option<TimingRow>>;

    async fn get_participant(&self, event_year_id: i64, stable_id: &str) -> Result<Option<Person>>;

    async fn get_participants(&self, event_year_id: i64) -> Result<Vec<Person>>;

    async fn count_results(&self, event_year_id: i64) -> Result<i64>;

    async fn count_participants(&self, event_year_id: i64) -> Result<i64>;

    /// Deletes the named reads. Keys that match nothing are skipped.
    async fn delete_results(&self, event_year_id: i64, keys: &[ResultKey]) -> Result<u64>;

    /// Deletes every read of the event-year, then its orphaned participants.
    /// Returns the number of reads deleted.
    async fn delete_event_results(&self, event_year_id: i64) -> Result<u64>;

    /// Deletes the given participants, or all of the event-year's when
    /// `stable_ids` is empty. Participants that still own reads make the
    /// whole call fail.
    async fn delete_participants(&self, event_year_id: i64, stable_ids: &[String]) -> Result<u64>;
}
