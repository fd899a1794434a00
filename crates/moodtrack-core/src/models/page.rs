use serde::{Deserialize, Serialize};

/// Default number of rows per list page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Which page of a list to fetch (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn first(page_size: u32) -> Self {
        Self::new(1, page_size)
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u32 {
        self.page_size
    }

    /// Query parameters in the order the API documents them
    pub fn query_pairs(&self) -> [(&'static str, u64); 2] {
        [("offset", self.offset()), ("limit", u64::from(self.limit()))]
    }

    pub fn next(&self) -> Self {
        Self::new(self.page + 1, self.page_size)
    }

    pub fn previous(&self) -> Self {
        Self::new(self.page.saturating_sub(1), self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

/// Number of pages needed to show `count` rows, `page_size` at a time
pub fn total_pages(count: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(u64::from(page_size))
}

/// Paginated list envelope returned by list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            count: 0,
            next: None,
            previous: None,
        }
    }
}

impl<T> Page<T> {
    pub fn total_pages(&self, page_size: u32) -> u64 {
        total_pages(self.count, page_size)
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// "page 2 of 5" style label; an empty list still reads as one page
    pub fn position_label(&self, request: PageRequest) -> String {
        format!(
            "page {} of {}",
            request.page,
            self.total_pages(request.page_size).max(1)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_limit() {
        let req = PageRequest::new(2, 10);
        assert_eq!(req.offset(), 10);
        assert_eq!(req.limit(), 10);
        assert_eq!(req.query_pairs(), [("offset", 10), ("limit", 10)]);

        assert_eq!(PageRequest::new(1, 25).offset(), 0);
        assert_eq!(PageRequest::new(4, 25).offset(), 75);
    }

    #[test]
    fn test_page_request_clamps() {
        assert_eq!(PageRequest::new(0, 10).page, 1);
        assert_eq!(PageRequest::new(1, 0).page_size, 1);
        assert_eq!(PageRequest::new(1, 10).previous().page, 1);
        assert_eq!(PageRequest::new(3, 10).next().page, 4);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(95, 10), 10);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_parse_envelope() {
        let json = r#"{"count": 23, "next": "http://api/emotions/?limit=10&offset=20", "previous": "http://api/emotions/?limit=10", "results": [1, 2, 3]}"#;
        let page: Page<u32> = serde_json::from_str(json).expect("parse page");
        assert_eq!(page.results, vec![1, 2, 3]);
        assert_eq!(page.total_pages(10), 3);
        assert!(page.has_next());
        assert!(page.has_previous());
        assert_eq!(page.position_label(PageRequest::new(2, 10)), "page 2 of 3");
    }

    #[test]
    fn test_empty_page_label() {
        let page: Page<u32> = Page::default();
        assert_eq!(page.position_label(PageRequest::default()), "page 1 of 1");
    }
}
