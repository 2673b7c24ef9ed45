use serde::{Deserialize, Serialize};

/// ListRequest: search term and page window shared by every listing endpoint.
///
/// `page` is 1-indexed. Construction is left to the HTTP layer, which owns
/// the defaults and bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub search: Option<String>,
    pub page: u64,
    pub limit: u64,
}

impl ListRequest {
    pub fn new(search: Option<String>, page: u64, limit: u64) -> Self {
        let search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Self { search, page, limit }
    }

    /// Number of rows to skip: `(page - 1) * limit`.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl Default for ListRequest {
    fn default() -> Self {
        Self {
            search: None,
            page: 1,
            limit: 10,
        }
    }
}

/// Page: one window of a listing plus the total number of matching rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub count: i64,
}
