//! Page arithmetic.

use std::ops::Range;

/// Zero-indexed page position and fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page_index: usize,
    page_size: usize,
}

impl Pagination {
    /// Default number of rows per page.
    pub const DEFAULT_PAGE_SIZE: usize = 10;

    /// Start on the first page. A size of 0 is treated as 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Change the page size and return to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page_index = 0;
    }

    /// Number of pages for `len` rows; never less than 1.
    pub fn page_count(&self, len: usize) -> usize {
        len.div_ceil(self.page_size).max(1)
    }

    /// Row range of the current page, clamped to `len`.
    ///
    /// An index past the end yields an empty range.
    pub fn range(&self, len: usize) -> Range<usize> {
        let start = self.page_index.saturating_mul(self.page_size).min(len);
        let end = start.saturating_add(self.page_size).min(len);
        start..end
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE_SIZE)
    }
}
