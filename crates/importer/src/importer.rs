use std::path::Path;

use results_storage::Database;
use results_storage::models::TimingRow;
use tracing::info;

use crate::batch::{BatchValidator, ResultBatch};
use crate::{ImporterError, Result};

/// Loads batch files and hands them to the store.
pub struct BatchImporter<'a> {
    db: &'a Database,
}

impl<'a> BatchImporter<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn load(path: &Path) -> Result<ResultBatch> {
        let json_content = tokio::fs::read_to_string(path).await?;
        let batch: ResultBatch = serde_json::from_str(&json_content)?;
        Ok(batch)
    }

    /// Validates the batch and ingests it into `event_year_id`, or into the
    /// event-year named by the file when no id is given.
    pub async fn import(
        &self,
        batch: &ResultBatch,
        event_year_id: Option<i64>,
    ) -> Result<Vec<TimingRow>> {
        let event_year_id = resolve_event_year(batch, event_year_id)?;

        let report = BatchValidator::validate(batch)?;
        report.log_warnings();

        info!(
            "Importing {} row(s) into event year {}",
            batch.rows.len(),
            event_year_id
        );
        let stored = self.db.ingest_results(event_year_id, &batch.rows).await?;

        Ok(stored)
    }
}

pub fn resolve_event_year(batch: &ResultBatch, requested: Option<i64>) -> Result<i64> {
    match (requested, batch.event_year_id) {
        (Some(requested), Some(in_file)) if requested != in_file => {
            Err(ImporterError::ImportError(format!(
                "--event-year {} does not match event_year_id {} in the batch file",
                requested, in_file
            )))
        }
        (Some(id), _) | (None, Some(id)) => Ok(id),
        (None, None) => Err(ImporterError::ImportError(
            "no event year given: pass --event-year or set event_year_id in the file".to_string(),
        )),
    }
}
