use std::time::Instant;

use tracing::info;
use validator::Validate;

use super::timed;
use crate::Database;
use crate::error::{Result, StorageError};
use crate::models::TimingRow;

impl Database {
    /// Upserts a batch of timing rows for one event-year in one transaction.
    ///
    /// Rows are validated before anything touches the store. The returned
    /// rows echo the input; they are not read back.
    pub async fn ingest_results(
        &self,
        event_year_id: i64,
        rows: &[TimingRow],
    ) -> Result<Vec<TimingRow>> {
        validate_batch(rows)?;

        let started = Instant::now();
        let stored = timed(
            "ingest results",
            self.timeouts.batch,
            self.store.ingest_results(event_year_id, rows),
        )
        .await?;

        info!(
            "Ingested {} row(s) for event year {} in {:?}",
            stored.len(),
            event_year_id,
            started.elapsed()
        );

        Ok(stored)
    }
}

fn validate_batch(rows: &[TimingRow]) -> Result<()> {
    if rows.is_empty() {
        return Err(StorageError::Validation(
            "ingestion batch is empty".to_string(),
        ));
    }

    for (idx, row) in rows.iter().enumerate() {
        row.validate().map_err(|e| {
            StorageError::Validation(format!("row {} ({}): {}", idx, row.label(), e))
        })?;
    }

    Ok(())
}
