use chrono::{DateTime, Utc};
use results_storage::models::TimingRow;
use serde::{Deserialize, Serialize};

pub const FORMAT_VERSION: &str = "1.0.0";

/// On-disk batch of timing rows for one event-year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultBatch {
    pub format_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceMetadata>,
    /// Target event-year. The `--event-year` flag must agree when both are set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_year_id: Option<i64>,
    pub rows: Vec<TimingRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    #[serde(rename = "type")]
    pub r#type: SourceType,
    pub exported_at: DateTime<Utc>,
    pub exporter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Timer,
    Csv,
    Manual,
}
