use serde::{Deserialize, Serialize};

/// Optional paging for the result views.
///
/// Pages are zero-indexed. A `limit` of zero or less disables paging and the
/// whole filtered set is returned, whatever `page` says.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Pagination {
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub page: i64,
}

impl Pagination {
    pub fn unpaged() -> Self {
        Self::default()
    }

    pub fn new(limit: i64, page: i64) -> Self {
        Self { limit, page }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.is_paged() && self.page < 0 {
            return Err("page must be >= 0".to_string());
        }
        Ok(())
    }

    pub fn is_paged(&self) -> bool {
        self.limit > 0
    }

    /// `(limit, offset)` to apply, or `None` when unpaged.
    pub fn window(&self) -> Option<(i64, i64)> {
        self.is_paged()
            .then(|| (self.limit, self.page.saturating_mul(self.limit)))
    }
}

/// Rows of one view page together with the paging that produced them.
#[derive(Debug, Clone, Serialize)]
pub struct ResultPage<T> {
    pub data: Vec<T>,
    pub pagination: PageMeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub returned: usize,
}

impl<T> ResultPage<T> {
    pub fn new(data: Vec<T>, pagination: Pagination) -> Self {
        let (page, limit) = if pagination.is_paged() {
            (pagination.page, pagination.limit)
        } else {
            (0, 0)
        };
        Self {
            pagination: PageMeta {
                page,
                limit,
                returned: data.len(),
            },
            data,
        }
    }
}
