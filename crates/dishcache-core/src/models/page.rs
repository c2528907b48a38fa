//! Paged listings and the bookkeeping that drives "load more".

use serde::{Deserialize, Serialize};

/// Default number of records requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// One page of records as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
    #[serde(default)]
    pub total: i64,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            total: 0,
        }
    }
}

/// Page request parameters, serialized as `current`/`size`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PageQuery {
    pub current: u32,
    pub size: u32,
}

impl PageQuery {
    pub fn first(size: u32) -> Self {
        Self { current: 1, size }
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

/// Accumulates a paged listing.
///
/// `has_more` is true exactly when the last page came back full; a short
/// page ends the listing.
#[derive(Debug, Clone)]
pub struct Pager<T> {
    size: u32,
    current: u32,
    total: i64,
    has_more: bool,
    loading: bool,
    items: Vec<T>,
}

impl<T> Pager<T> {
    pub fn new(size: u32) -> Self {
        Self {
            size: size.max(1),
            current: 0,
            total: 0,
            has_more: true,
            loading: false,
            items: Vec::new(),
        }
    }

    /// Query for the next page, or `None` when the listing is exhausted or a
    /// load is already in flight. Marks the pager as loading.
    pub fn next_query(&mut self) -> Option<PageQuery> {
        if !self.has_more || self.loading {
            return None;
        }
        self.loading = true;
        Some(PageQuery {
            current: self.current + 1,
            size: self.size,
        })
    }

    /// Record a successfully loaded page.
    pub fn apply(&mut self, page: Page<T>) {
        self.loading = false;
        self.current += 1;
        self.total = page.total;
        self.has_more = page.records.len() == self.size as usize;
        self.items.extend(page.records);
    }

    /// Record a failed load; the same page will be requested again.
    pub fn fail(&mut self) {
        self.loading = false;
    }

    /// Back to an empty listing (pull-to-refresh).
    pub fn reset(&mut self) {
        self.current = 0;
        self.total = 0;
        self.has_more = true;
        self.loading = false;
        self.items.clear();
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn current_page(&self) -> u32 {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: usize, total: i64) -> Page<usize> {
        Page {
            records: (0..n).collect(),
            total,
        }
    }

    #[test]
    fn test_pager_walks_until_short_page() {
        let mut pager = Pager::new(2);

        let q = pager.next_query().unwrap();
        assert_eq!(q, PageQuery { current: 1, size: 2 });
        assert!(pager.next_query().is_none(), "load already in flight");
        pager.apply(page(2, 3));
        assert!(pager.has_more());

        let q = pager.next_query().unwrap();
        assert_eq!(q.current, 2);
        pager.apply(page(1, 3));

        assert!(!pager.has_more());
        assert!(pager.next_query().is_none());
        assert_eq!(pager.items().len(), 3);
        assert_eq!(pager.total(), 3);
    }

    #[test]
    fn test_pager_failure_retries_same_page() {
        let mut pager: Pager<usize> = Pager::new(10);
        assert_eq!(pager.next_query().unwrap().current, 1);
        pager.fail();
        assert_eq!(pager.next_query().unwrap().current, 1);
    }

    #[test]
    fn test_pager_reset() {
        let mut pager = Pager::new(1);
        pager.next_query();
        pager.apply(page(1, 5));
        pager.reset();
        assert_eq!(pager.current_page(), 0);
        assert!(pager.items().is_empty());
        assert!(pager.has_more());
    }

    #[test]
    fn test_parse_page_without_records() {
        let parsed: Page<u32> = serde_json::from_str(r#"{"total": 0}"#).unwrap();
        assert!(parsed.records.is_empty());
    }
}
