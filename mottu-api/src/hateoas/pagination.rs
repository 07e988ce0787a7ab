//! Pagination policy: effective page window and navigation links

use axum::http::Method;
use serde::{Deserialize, Serialize};

use super::{Link, LinkBuilder, PagedResult};
use crate::config::{PaginationConfig, MAX_PAGE_SIZE};
use crate::repository::Pagination;

/// Raw `?page=&pageSize=` query parameters
///
/// Any integer is accepted; [`PageWindow::resolve`] normalizes them.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default, rename = "pageSize")]
    pub page_size: Option<i64>,
}

impl PageQuery {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
        }
    }
}

/// Effective page and page size after normalization
///
/// `page >= 1` and `1 <= page_size <= max_page_size` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page: u64,
    page_size: u64,
}

impl PageWindow {
    /// Clamp a requested page to `>= 1` and a page size into `[1, max]`
    ///
    /// `max` is the policy's cap, itself never above [`MAX_PAGE_SIZE`].
    pub fn resolve(query: &PageQuery, policy: &PaginationConfig) -> Self {
        let max = policy.max_page_size.clamp(1, MAX_PAGE_SIZE);
        let page = query.page.unwrap_or(1).max(1).unsigned_abs();
        let page_size = match query.page_size {
            Some(size) => size
                .clamp(1, i64::try_from(max).unwrap_or(i64::MAX))
                .unsigned_abs(),
            None => policy.default_page_size.clamp(1, max),
        };

        Self { page, page_size }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Number of items before this page
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn has_prev(&self) -> bool {
        self.offset() > 0
    }

    pub fn has_next(&self, total_items: u64) -> bool {
        self.page.saturating_mul(self.page_size) < total_items
    }

    /// Repository slice for this window
    pub fn to_pagination(&self) -> Pagination {
        Pagination::new(self.offset(), self.page_size)
    }

    /// `self`, then `prev` and `next` when they exist
    pub fn links(&self, builder: &LinkBuilder, collection: &str, total_items: u64) -> Vec<Link> {
        let mut links = vec![builder.self_link(&self.page_path(collection, self.page))];

        if self.has_prev() {
            links.push(builder.action(
                "prev",
                &self.page_path(collection, self.page - 1),
                Method::GET,
            ));
        }

        if self.has_next(total_items) {
            links.push(builder.action(
                "next",
                &self.page_path(collection, self.page + 1),
                Method::GET,
            ));
        }

        links
    }

    /// Wrap a fetched slice into a linked page
    pub fn into_result<T>(
        self,
        items: Vec<T>,
        total_items: u64,
        builder: &LinkBuilder,
        collection: &str,
    ) -> PagedResult<T> {
        let links = self.links(builder, collection, total_items);
        PagedResult::new(items, self.page, self.page_size, total_items).with_links(links)
    }

    fn page_path(&self, collection: &str, page: u64) -> String {
        format!("{}?page={}&pageSize={}", collection, page, self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hateoas::RequestOrigin;

    fn policy() -> PaginationConfig {
        PaginationConfig::default()
    }

    fn window(page: i64, page_size: i64) -> PageWindow {
        PageWindow::resolve(&PageQuery::new(page, page_size), &policy())
    }

    fn builder() -> LinkBuilder {
        LinkBuilder::new(&RequestOrigin::new("http", "localhost:8080"))
    }

    fn rels(links: &[Link]) -> Vec<&str> {
        links.iter().map(|l| l.rel.as_str()).collect()
    }

    #[test]
    fn test_defaults_when_absent() {
        let window = PageWindow::resolve(&PageQuery::default(), &policy());
        assert_eq!(window.page(), 1);
        assert_eq!(window.page_size(), 10);
        assert_eq!(window.offset(), 0);
    }

    #[test]
    fn test_page_is_at_least_one() {
        assert_eq!(window(0, 10).page(), 1);
        assert_eq!(window(-7, 10).page(), 1);
        assert_eq!(window(i64::MIN, 10).page(), 1);
    }

    #[test]
    fn test_page_size_is_clamped() {
        assert_eq!(window(1, 500).page_size(), 100);
        assert_eq!(window(1, -3).page_size(), 1);
        assert_eq!(window(1, 0).page_size(), 1);
        assert_eq!(window(1, 100).page_size(), 100);
        assert_eq!(window(1, i64::MAX).page_size(), 100);
    }

    #[test]
    fn test_offset() {
        assert_eq!(window(3, 10).offset(), 20);
        assert_eq!(window(1, 50).offset(), 0);
        assert_eq!(window(i64::MAX, 100).offset(), u64::MAX);
    }

    #[test]
    fn test_first_of_three_pages() {
        let links = window(1, 10).links(&builder(), "/api/motos", 25);
        assert_eq!(rels(&links), ["self", "next"]);
        assert_eq!(links[0].href, "http://localhost:8080/api/motos?page=1&pageSize=10");
        assert_eq!(links[1].href, "http://localhost:8080/api/motos?page=2&pageSize=10");
    }

    #[test]
    fn test_last_page() {
        let links = window(3, 10).links(&builder(), "/api/motos", 25);
        assert_eq!(rels(&links), ["self", "prev"]);
        assert_eq!(links[1].href, "http://localhost:8080/api/motos?page=2&pageSize=10");
    }

    #[test]
    fn test_middle_page_orders_self_prev_next() {
        let links = window(2, 10).links(&builder(), "/api/usuarios", 25);
        assert_eq!(rels(&links), ["self", "prev", "next"]);
    }

    #[test]
    fn test_beyond_last_page() {
        let links = window(4, 10).links(&builder(), "/api/motos", 25);
        assert_eq!(rels(&links), ["self", "prev"]);
    }

    #[test]
    fn test_empty_collection() {
        let links = window(1, 10).links(&builder(), "/api/enderecos", 0);
        assert_eq!(rels(&links), ["self"]);
    }

    #[test]
    fn test_self_link_uses_effective_values() {
        let links = window(0, 500).links(&builder(), "/api/motos", 3);
        assert_eq!(links[0].href, "http://localhost:8080/api/motos?page=1&pageSize=100");
    }

    #[test]
    fn test_prev_and_next_rules_hold_across_grid() {
        for total in [0_u64, 1, 9, 10, 11, 25, 100] {
            for page in 1..=5_i64 {
                for size in [1_i64, 3, 10, 100] {
                    let w = window(page, size);
                    let links = w.links(&builder(), "/api/motos", total);
                    let has = |rel: &str| links.iter().any(|l| l.rel == rel);

                    let p = page as u64;
                    let s = size as u64;
                    assert_eq!(has("next"), p * s < total);
                    assert_eq!(has("prev"), (p - 1) * s > 0);
                    assert_eq!(links.iter().filter(|l| l.is_self()).count(), 1);
                }
            }
        }
    }

    #[test]
    fn test_into_result() {
        let page = window(2, 10).into_result(vec!["k"; 10], 25, &builder(), "/api/motos");
        assert_eq!(page.page, 2);
        assert_eq!(page.page_size, 10);
        assert_eq!(page.total_pages, 3);
        assert_eq!(rels(&page.links), ["self", "prev", "next"]);
    }

    #[test]
    fn test_custom_policy() {
        let policy = PaginationConfig {
            default_page_size: 5,
            max_page_size: 20,
        };
        let w = PageWindow::resolve(&PageQuery::default(), &policy);
        assert_eq!(w.page_size(), 5);
        let w = PageWindow::resolve(&PageQuery::new(1, 50), &policy);
        assert_eq!(w.page_size(), 20);
    }

    #[test]
    fn test_policy_cap_never_exceeds_hard_limit() {
        let policy = PaginationConfig {
            default_page_size: 10,
            max_page_size: 500,
        };
        let w = PageWindow::resolve(&PageQuery::new(1, 500), &policy);
        assert_eq!(w.page_size(), 100);

        let generous_default = PaginationConfig {
            default_page_size: 300,
            max_page_size: 500,
        };
        let w = PageWindow::resolve(&PageQuery::default(), &generous_default);
        assert_eq!(w.page_size(), 100);
    }
}
