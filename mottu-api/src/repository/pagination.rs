//! Slice parameters for repository queries

/// Offset/limit window over a key-ordered collection
///
/// # Example
///
/// ```rust
/// use mottu_api::repository::Pagination;
///
/// let page = Pagination::page(3, 10);
/// assert_eq!(page.offset, 20);
/// assert_eq!(page.limit, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Number of results to skip
    pub offset: u64,
    /// Maximum number of results to return
    pub limit: u64,
}

impl Pagination {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Window for a 1-based page number
    pub fn page(page: u64, per_page: u64) -> Self {
        Self {
            offset: page.saturating_sub(1).saturating_mul(per_page),
            limit: per_page,
        }
    }

    /// Offset as a SQL `OFFSET` value
    pub fn offset_i64(&self) -> i64 {
        i64::try_from(self.offset).unwrap_or(i64::MAX)
    }

    /// Limit as a SQL `LIMIT` value
    pub fn limit_i64(&self) -> i64 {
        i64::try_from(self.limit).unwrap_or(i64::MAX)
    }

    /// `usize` offset for in-memory slicing
    pub fn offset_usize(&self) -> usize {
        usize::try_from(self.offset).unwrap_or(usize::MAX)
    }

    /// `usize` limit for in-memory slicing
    pub fn limit_usize(&self) -> usize {
        usize::try_from(self.limit).unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_zero_is_first_page() {
        assert_eq!(Pagination::page(0, 10), Pagination::new(0, 10));
        assert_eq!(Pagination::page(1, 10), Pagination::new(0, 10));
    }

    #[test]
    fn test_saturating_conversions() {
        let huge = Pagination::new(u64::MAX, u64::MAX);
        assert_eq!(huge.offset_i64(), i64::MAX);
        assert_eq!(huge.limit_i64(), i64::MAX);
        assert_eq!(Pagination::page(u64::MAX, 100).offset, u64::MAX);
    }
}
