use serde::{Deserialize, Serialize};

use super::common::Pagination;

/// Which rows of the Result/Person join a query returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultView {
    /// Every timing read.
    #[default]
    All,
    /// Only reads flagged as finishes.
    Finish,
    /// One representative read per participant.
    ///
    /// The representative read is the one with the highest `occurrence`;
    /// ties go to the later gun time, then the greater location name. The
    /// same rule applies with or without a distance filter.
    Last,
}

impl ResultView {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Finish => "finish",
            Self::Last => "last",
        }
    }
}

impl std::str::FromStr for ResultView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "finish" => Ok(Self::Finish),
            "last" => Ok(Self::Last),
            other => Err(format!(
                "unknown view '{}', expected one of: all, finish, last",
                other
            )),
        }
    }
}

/// A view plus its optional filters and paging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResultQuery {
    #[serde(default)]
    pub view: ResultView,
    pub distance: Option<String>,
    pub bib: Option<String>,
    #[serde(flatten)]
    pub pagination: Pagination,
}

impl ResultQuery {
    pub fn all() -> Self {
        Self::view(ResultView::All)
    }

    pub fn finish() -> Self {
        Self::view(ResultView::Finish)
    }

    pub fn last() -> Self {
        Self::view(ResultView::Last)
    }

    pub fn view(view: ResultView) -> Self {
        Self {
            view,
            ..Self::default()
        }
    }

    pub fn with_distance(mut self, distance: impl Into<String>) -> Self {
        self.distance = Some(distance.into());
        self
    }

    pub fn with_bib(mut self, bib: impl Into<String>) -> Self {
        self.bib = Some(bib.into());
        self
    }

    pub fn paginate(mut self, limit: i64, page: i64) -> Self {
        self.pagination = Pagination::new(limit, page);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        self.pagination.validate()?;

        if let Some(ref distance) = self.distance
            && distance.is_empty()
        {
            return Err("distance filter cannot be empty".to_string());
        }

        if let Some(ref bib) = self.bib
            && bib.is_empty()
        {
            return Err("bib filter cannot be empty".to_string());
        }

        Ok(())
    }
}

/// Identifies one Result row inside an event-year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ResultKey {
    pub bib: String,
    pub location: String,
    pub occurrence: i32,
}

impl ResultKey {
    pub fn new(bib: impl Into<String>, location: impl Into<String>, occurrence: i32) -> Self {
        Self {
            bib: bib.into(),
            location: location.into(),
            occurrence,
        }
    }
}

impl std::fmt::Display for ResultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.bib, self.location, self.occurrence)
    }
}

impl std::str::FromStr for ResultKey {
    type Err = String;

    /// Parses `bib:location:occurrence`. The location may itself contain
    /// colons; bib and occurrence may not.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (bib, rest) = s
            .split_once(':')
            .ok_or_else(|| format!("expected bib:location:occurrence, got '{}'", s))?;
        let (location, occurrence) = rest
            .rsplit_once(':')
            .ok_or_else(|| format!("expected bib:location:occurrence, got '{}'", s))?;
        if bib.is_empty() || location.is_empty() {
            return Err(format!("bib and location cannot be empty in '{}'", s));
        }
        let occurrence = occurrence
            .parse()
            .map_err(|_| format!("invalid occurrence '{}' in '{}'", occurrence, s))?;
        Ok(Self::new(bib, location, occurrence))
    }
}
