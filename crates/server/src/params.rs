//! Query-string parameters of the listing endpoints.

use model::{ListRequest, OrderListRequest, ProductListRequest};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

/// Bounds applied to `page`/`limit` when a listing request is bound.
#[derive(Debug, Clone, Copy)]
pub struct ListSettings {
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 1000,
        }
    }
}

/// `?search=&page=&limit=` plus the optional per-endpoint filters.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub user_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
}

impl ListParams {
    /// Applies defaults and rejects a zero page or a limit outside `1..=max`.
    pub fn list(&self, settings: ListSettings) -> Result<ListRequest, ApiError> {
        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err(ApiError::validation("page must be at least 1"));
        }
        let limit = self.limit.unwrap_or(settings.default_limit);
        if limit == 0 || limit > settings.max_limit {
            return Err(ApiError::validation(format!(
                "limit must be between 1 and {}",
                settings.max_limit
            )));
        }
        Ok(ListRequest::new(self.search.clone(), page, limit))
    }

    pub fn orders(&self, settings: ListSettings) -> Result<OrderListRequest, ApiError> {
        Ok(OrderListRequest {
            list: self.list(settings)?,
            user_id: self.user_id,
        })
    }

    pub fn products(&self, settings: ListSettings) -> Result<ProductListRequest, ApiError> {
        Ok(ProductListRequest {
            list: self.list(settings)?,
            category_id: self.category_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_values() {
        let req = ListParams::default().list(ListSettings::default()).unwrap();
        assert_eq!(req, ListRequest::new(None, 1, 10));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let settings = ListSettings {
            default_limit: 10,
            max_limit: 50,
        };
        let zero_page = ListParams {
            page: Some(0),
            ..Default::default()
        };
        assert!(matches!(zero_page.list(settings), Err(ApiError::Validation(_))));

        let huge = ListParams {
            limit: Some(51),
            ..Default::default()
        };
        assert!(matches!(huge.list(settings), Err(ApiError::Validation(_))));
    }

    #[test]
    fn filters_are_carried_over() {
        let user = Uuid::new_v4();
        let params = ListParams {
            search: Some("chilonzor".into()),
            page: Some(3),
            limit: Some(20),
            user_id: Some(user),
            category_id: None,
        };
        let req = params.orders(ListSettings::default()).unwrap();
        assert_eq!(req.user_id, Some(user));
        assert_eq!(req.list.offset(), 40);
    }
}
