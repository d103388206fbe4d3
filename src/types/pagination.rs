//! Pagination types for list endpoints.
//!
//! Pages are 0-based. Sort fields are resolved per resource by the
//! repositories, which reject anything outside their allow-list.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_NUMBER, MAX_PAGE_SIZE};
use crate::domain::{
    NewsDto, OrderDto, OrderManagementDto, PointsTransactionDto, ServiceDto, UserManagementDto,
};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Anything other than `desc` (any case) sorts ascending
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

/// Pagination query parameters
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number (0-based)
    #[serde(default)]
    pub page: Option<u64>,
    /// Page size (capped at 100)
    #[serde(default)]
    pub size: Option<u64>,
    /// Field to sort by
    #[serde(default)]
    pub sort_by: Option<String>,
    /// `asc` or `desc`
    #[serde(default)]
    pub sort_dir: Option<String>,
}

impl PageQuery {
    /// Resolve the query against the endpoint's default sort
    pub fn to_request(&self, default_sort: &str, default_dir: SortDirection) -> PageRequest {
        PageRequest {
            page: self.page.unwrap_or(DEFAULT_PAGE_NUMBER).min(MAX_PAGE_NUMBER),
            size: self
                .size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
            sort_by: self
                .sort_by
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| default_sort.to_string()),
            direction: self
                .sort_dir
                .as_deref()
                .map(SortDirection::parse)
                .unwrap_or(default_dir),
        }
    }
}

/// A resolved page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    pub sort_by: String,
    pub direction: SortDirection,
}

impl PageRequest {
    pub fn new(page: u64, size: u64, sort_by: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            page: page.min(MAX_PAGE_NUMBER),
            size: size.clamp(1, MAX_PAGE_SIZE),
            sort_by: sort_by.into(),
            direction,
        }
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[aliases(
    ServicePage = Page<ServiceDto>,
    OrderPage = Page<OrderDto>,
    NewsPage = Page<NewsDto>,
    PointsPage = Page<PointsTransactionDto>,
    UserPage = Page<UserManagementDto>,
    OrderManagementPage = Page<OrderManagementDto>
)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let total_pages = total_elements.div_ceil(request.size);
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages,
            first: request.page == 0,
            last: request.page.saturating_add(1) >= total_pages,
        }
    }

    /// Convert the content while keeping the page metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            first: self.first,
            last: self.last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let request = PageQuery::default().to_request("createdAt", SortDirection::Desc);
        assert_eq!(request.page, 0);
        assert_eq!(request.size, DEFAULT_PAGE_SIZE);
        assert_eq!(request.sort_by, "createdAt");
        assert_eq!(request.direction, SortDirection::Desc);
    }

    #[test]
    fn test_size_capped() {
        let query = PageQuery {
            size: Some(5000),
            ..Default::default()
        };
        assert_eq!(query.to_request("id", SortDirection::Asc).size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_huge_page_number_is_capped() {
        let query = PageQuery {
            page: Some(u64::MAX),
            ..Default::default()
        };
        let request = query.to_request("id", SortDirection::Asc);
        assert_eq!(request.page, MAX_PAGE_NUMBER);
        assert!(request.page.checked_mul(request.size).is_some());

        let page: Page<u8> = Page::new(vec![], &request, 5);
        assert!(page.last);
        assert!(!page.first);

        let direct = PageRequest::new(u64::MAX, MAX_PAGE_SIZE, "id", SortDirection::Asc);
        assert!(direct.page.checked_mul(direct.size).is_some());
    }

    #[test]
    fn test_sort_dir_case_insensitive() {
        let query = PageQuery {
            sort_dir: Some("DESC".into()),
            ..Default::default()
        };
        assert_eq!(
            query.to_request("id", SortDirection::Asc).direction,
            SortDirection::Desc
        );
    }

    #[test]
    fn test_page_metadata() {
        let request = PageRequest::new(1, 10, "id", SortDirection::Asc);
        let page = Page::new(vec![1, 2, 3], &request, 23);
        assert_eq!(page.total_pages, 3);
        assert!(!page.first);
        assert!(!page.last);

        let request = PageRequest::new(0, 10, "id", SortDirection::Asc);
        let empty: Page<u8> = Page::new(vec![], &request, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(empty.first);
        assert!(empty.last);
    }
}
