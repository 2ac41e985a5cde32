//! Page-number pagination with forgiving input.
//!
//! Anything that is not a positive integer means page 1; a number past the
//! end means the last page. A collection always has at least one page.

use std::num::IntErrorKind;

use serde::Serialize;

/// Default number of posts per list page.
pub const DEFAULT_PAGE_SIZE: u64 = 3;

/// Parse a raw `page` query value, falling back to the first page.
///
/// Numbers too large for `u64` saturate, so they still land on the last page.
pub fn parse_page_number(raw: Option<&str>) -> u64 {
    let Some(raw) = raw else {
        return 1;
    };
    match raw.trim().parse::<u64>() {
        Ok(n) if n >= 1 => n,
        Err(err) if *err.kind() == IntErrorKind::PosOverflow => u64::MAX,
        _ => 1,
    }
}

/// Offset/limit window of a resolved page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u64,
    pub num_pages: u64,
    pub offset: u64,
    pub limit: u64,
}

/// Resolves page numbers against a known item count.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    per_page: u64,
    total: u64,
}

impl Paginator {
    pub fn new(per_page: u64, total: u64) -> Self {
        Self {
            per_page: per_page.max(1),
            total,
        }
    }

    pub fn num_pages(&self) -> u64 {
        self.total.div_ceil(self.per_page).max(1)
    }

    /// Clamp the requested page into range and compute its window.
    pub fn window(&self, raw: Option<&str>) -> PageWindow {
        let num_pages = self.num_pages();
        let number = parse_page_number(raw).min(num_pages);
        PageWindow {
            number,
            num_pages,
            offset: (number - 1) * self.per_page,
            limit: self.per_page,
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, window: PageWindow, total: u64) -> Self {
        Self {
            items,
            number: window.number,
            num_pages: window.num_pages,
            total,
        }
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_page_means_first() {
        assert_eq!(parse_page_number(Some("abc")), 1);
        assert_eq!(parse_page_number(Some("0")), 1);
        assert_eq!(parse_page_number(Some("-2")), 1);
        assert_eq!(parse_page_number(Some("")), 1);
        assert_eq!(parse_page_number(None), 1);
        assert_eq!(parse_page_number(Some(" 2 ")), 2);
        assert_eq!(parse_page_number(Some("-99999999999999999999999")), 1);
    }

    #[test]
    fn test_page_past_end_clamps_to_last() {
        let paginator = Paginator::new(3, 7);
        assert_eq!(paginator.num_pages(), 3);
        let window = paginator.window(Some("99"));
        assert_eq!(window.number, 3);
        assert_eq!(window.offset, 6);
        assert_eq!(window.limit, 3);
        assert_eq!(window, paginator.window(Some("3")));
        assert_eq!(paginator.window(Some("99999999999999999999999")), window);
    }

    #[test]
    fn test_empty_collection_has_one_page() {
        let paginator = Paginator::new(3, 0);
        assert_eq!(paginator.num_pages(), 1);
        let window = paginator.window(Some("5"));
        assert_eq!(window.number, 1);
        assert_eq!(window.offset, 0);
    }

    #[test]
    fn test_page_navigation_flags() {
        let window = Paginator::new(3, 7).window(Some("2"));
        let page = Page::new(vec![4, 5, 6], window, 7);
        assert!(page.has_next());
        assert!(page.has_previous());
    }
}
