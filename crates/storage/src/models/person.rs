use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Canonical identity of one participant within one event-year.
///
/// `id` is assigned by the store and never changes for the lifetime of the
/// row. `stable_id` is the caller's identity key; `bib` may be reassigned by
/// later ingestion runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Person {
    pub id: i64,
    pub event_year_id: i64,
    pub stable_id: String,
    pub bib: String,
    pub first_name: String,
    pub last_name: String,
    pub birthdate: String,
    pub age: i32,
    pub gender: String,
    pub age_group: String,
    pub distance: String,
    pub anonymous: bool,
}
