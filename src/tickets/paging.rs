//! Client-side "load more" pagination.
//!
//! All rows are fetched up front; paging only controls how many of them
//! are revealed.

use crate::config::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pager {
    /// A pager on page 0. A zero page size is treated as 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn at_page(page_size: usize, page: usize) -> Self {
        Self {
            page,
            ..Self::new(page_size)
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of rows the current page allows, before clamping
    pub fn window(&self) -> usize {
        (self.page + 1).saturating_mul(self.page_size)
    }

    /// Rows actually shown for `total` rows
    pub fn visible_count(&self, total: usize) -> usize {
        self.window().min(total)
    }

    pub fn has_more(&self, total: usize) -> bool {
        self.window() < total
    }

    /// Reveal the next page. Does nothing once everything is visible;
    /// returns whether anything changed.
    pub fn load_more(&mut self, total: usize) -> bool {
        if !self.has_more(total) {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn reset(&mut self) {
        self.page = 0;
    }

    /// The visible prefix of `rows`
    pub fn visible<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        &rows[..self.visible_count(rows.len())]
    }
}
