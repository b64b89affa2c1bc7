//! Pagination query parameters.

use serde::{Deserialize, Serialize};

use acervo_core::types::pagination::{DEFAULT_PAGE_SIZE, PageRequest};

/// Query parameters for paginated endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Page number, 1-based.
    pub page: Option<u64>,
    /// Items per page, capped at 100.
    pub page_size: Option<u64>,
}

impl PaginationParams {
    /// Converts to a `PageRequest` with the standard default size.
    pub fn into_page_request(self) -> PageRequest {
        self.with_default_size(DEFAULT_PAGE_SIZE)
    }

    /// Converts to a `PageRequest`, using `default_size` when no size was given.
    pub fn with_default_size(self, default_size: u64) -> PageRequest {
        PageRequest::from_parts(self.page, self.page_size, default_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = PaginationParams::default().into_page_request();
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_custom_default_size() {
        let page = PaginationParams {
            page: Some(3),
            page_size: None,
        }
        .with_default_size(50);
        assert_eq!(page.page, 3);
        assert_eq!(page.page_size, 50);
    }
}
