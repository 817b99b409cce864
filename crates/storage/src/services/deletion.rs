use tracing::info;

use super::timed;
use crate::Database;
use crate::dto::ResultKey;
use crate::error::Result;

impl Database {
    /// Deletes the named reads of one event-year. Participants are kept and
    /// keys that match nothing are ignored.
    pub async fn delete_results(&self, event_year_id: i64, keys: &[ResultKey]) -> Result<u64> {
        if keys.is_empty() {
            return Ok(0);
        }

        let deleted = timed(
            "delete results",
            self.timeouts.batch,
            self.store.delete_results(event_year_id, keys),
        )
        .await?;

        info!(
            "Deleted {} of {} requested result(s) for event year {}",
            deleted,
            keys.len(),
            event_year_id
        );

        Ok(deleted)
    }

    /// Removes every read of the event-year and then its participants.
    /// Returns the number of reads removed.
    pub async fn delete_event_results(&self, event_year_id: i64) -> Result<u64> {
        timed(
            "delete event results",
            self.timeouts.batch,
            self.store.delete_event_results(event_year_id),
        )
        .await
    }

    /// Removes participants by stable id, or every participant of the
    /// event-year when `stable_ids` is empty. Their reads must already be
    /// gone; see [`Database::delete_event_results`].
    pub async fn delete_participants(
        &self,
        event_year_id: i64,
        stable_ids: &[String],
    ) -> Result<u64> {
        let deleted = timed(
            "delete participants",
            self.timeouts.batch,
            self.store.delete_participants(event_year_id, stable_ids),
        )
        .await?;

        info!(
            "Deleted {} participant(s) for event year {}",
            deleted, event_year_id
        );

        Ok(deleted)
    }
}
