use std::collections::{HashMap, HashSet};

use tracing::warn;

use super::models::{FORMAT_VERSION, ResultBatch};
use crate::{ImporterError, Result};

pub struct BatchValidator;

impl BatchValidator {
    /// Checks a batch file before it is sent to the store.
    ///
    /// Field-level checks (lengths, ranges) are left to the store, which
    /// rejects the whole batch on the first bad row.
    pub fn validate(batch: &ResultBatch) -> Result<ValidationReport> {
        let mut report = ValidationReport::default();

        if batch.format_version != FORMAT_VERSION {
            report.errors.push(format!(
                "Unsupported format version: {}. Expected {}",
                batch.format_version, FORMAT_VERSION
            ));
        }

        if batch.rows.is_empty() {
            report.errors.push("At least one row is required".to_string());
        }

        if batch.source.is_none() {
            report
                .warnings
                .push("Batch source is not specified".to_string());
        }

        let mut read_keys = HashSet::new();
        let mut bibs_by_stable_id: HashMap<&str, HashSet<&str>> = HashMap::new();
        let mut stable_ids_by_bib: HashMap<&str, HashSet<&str>> = HashMap::new();

        for (idx, row) in batch.rows.iter().enumerate() {
            if !read_keys.insert((&row.stable_id, &row.location, row.occurrence)) {
                report.warnings.push(format!(
                    "Row {} repeats stable id '{}' at {} #{}; the last one wins",
                    idx, row.stable_id, row.location, row.occurrence
                ));
            }

            if row.finish && row.seconds == 0 {
                report.warnings.push(format!(
                    "Row {} ({}) is a finish with no gun time",
                    idx,
                    row.label()
                ));
            }

            bibs_by_stable_id
                .entry(&row.stable_id)
                .or_default()
                .insert(&row.bib);
            stable_ids_by_bib
                .entry(&row.bib)
                .or_default()
                .insert(&row.stable_id);
        }

        let mut shared: Vec<_> = bibs_by_stable_id
            .iter()
            .filter(|(_, bibs)| bibs.len() > 1)
            .map(|(stable_id, bibs)| {
                let mut bibs: Vec<_> = bibs.iter().copied().collect();
                bibs.sort_unstable();
                format!(
                    "Stable id '{}' appears with several bibs: {}",
                    stable_id,
                    bibs.join(", ")
                )
            })
            .collect();
        shared.extend(
            stable_ids_by_bib
                .iter()
                .filter(|(_, ids)| ids.len() > 1)
                .map(|(bib, ids)| {
                    let mut ids: Vec<_> = ids.iter().copied().collect();
                    ids.sort_unstable();
                    format!("Bib '{}' is used by several stable ids: {}", bib, ids.join(", "))
                }),
        );
        shared.sort();
        report.warnings.extend(shared);

        if !report.errors.is_empty() {
            Err(ImporterError::ValidationError(format!(
                "Validation failed with {} error(s): {}",
                report.errors.len(),
                report.errors.join("; ")
            )))
        } else {
            Ok(report)
        }
    }
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}
