use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::borrow::Cow;

use validator::{Validate, ValidationError};

/// Ranking value meaning "not computed yet".
pub const UNRANKED: i32 = -1;

fn unranked() -> i32 {
    UNRANKED
}

// MySQL pads trailing spaces when comparing, SQLite does not.
fn trimmed(value: &str) -> Result<(), ValidationError> {
    if value.trim() != value {
        return Err(ValidationError::new("surrounding_whitespace")
            .with_message(Cow::Borrowed("must not start or end with whitespace")));
    }
    Ok(())
}

/// A timing read joined with the participant it belongs to.
///
/// This is both the ingestion input shape and the row returned by every
/// retrieval view. Ranking fields are stored and echoed as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, Validate)]
pub struct TimingRow {
    #[validate(
        length(min = 1, max = 100, message = "stable_id must be between 1 and 100 characters"),
        custom(function = "trimmed")
    )]
    pub stable_id: String,

    #[validate(
        length(min = 1, max = 100, message = "bib must be between 1 and 100 characters"),
        custom(function = "trimmed")
    )]
    pub bib: String,

    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub birthdate: String,
    #[serde(default)]
    pub age: i32,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub age_group: String,
    #[validate(custom(function = "trimmed"))]
    #[serde(default)]
    pub distance: String,
    #[serde(default)]
    pub anonymous: bool,

    #[validate(
        length(min = 1, max = 100, message = "location must be between 1 and 100 characters"),
        custom(function = "trimmed")
    )]
    pub location: String,

    #[validate(range(min = 0, message = "occurrence must not be negative"))]
    pub occurrence: i32,

    #[validate(range(min = 0, message = "seconds must not be negative"))]
    pub seconds: i64,

    #[validate(range(min = 0, max = 999, message = "milliseconds must be between 0 and 999"))]
    #[serde(default)]
    pub milliseconds: i32,

    #[validate(range(min = 0, message = "chip_seconds must not be negative"))]
    #[serde(default)]
    pub chip_seconds: i64,

    #[validate(range(min = 0, max = 999, message = "chip_milliseconds must be between 0 and 999"))]
    #[serde(default)]
    pub chip_milliseconds: i32,

    #[serde(default)]
    pub segment: Option<String>,

    #[serde(default = "unranked")]
    pub ranking: i32,
    #[serde(default = "unranked")]
    pub age_ranking: i32,
    #[serde(default = "unranked")]
    pub gender_ranking: i32,

    #[serde(default)]
    pub finish: bool,

    /// Externally defined read code (normal, DNF, DNS, ...).
    #[serde(default)]
    pub result_type: i32,

    #[serde(default)]
    pub division: Option<String>,
    #[serde(default = "unranked")]
    pub division_ranking: i32,
}

impl TimingRow {
    /// Short label used in error contexts and log lines.
    pub fn label(&self) -> String {
        format!(
            "bib {}, stable id {}, {} #{}",
            self.bib, self.stable_id, self.location, self.occurrence
        )
    }
}
