//! Page envelope

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::Link;

/// One page of a collection with its metadata and navigation links
///
/// The page size is taken as given; callers clamp it before building the
/// page. `total_pages` is derived once at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub links: Vec<Link>,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, page: u64, page_size: u64, total_items: u64) -> Self {
        Self {
            items,
            page,
            page_size,
            total_items,
            total_pages: total_pages(total_items, page_size),
            links: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_links(mut self, links: impl IntoIterator<Item = Link>) -> Self {
        self.links.extend(links);
        self
    }
}

/// Ceiling of `total / page_size`; zero when either is zero
fn total_pages(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

impl<T: Serialize> IntoResponse for PagedResult<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(25, 1), 25);
        assert_eq!(total_pages(u64::MAX, 100), u64::MAX / 100 + 1);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_serializes_camel_case() {
        let page = PagedResult::new(vec![1, 2, 3], 1, 10, 3);
        let value = serde_json::to_value(&page).unwrap();

        assert_eq!(value["pageSize"], 10);
        assert_eq!(value["totalItems"], 3);
        assert_eq!(value["totalPages"], 1);
        assert!(value["links"].as_array().unwrap().is_empty());
    }
}
