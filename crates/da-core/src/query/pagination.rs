use std::ops::Range;
use serde::{Serialize, Deserialize};

use crate::QueryError;

/// Number of pages needed for `total_items` at `items_per_page`
pub fn total_pages(total_items: usize, items_per_page: usize) -> usize {
    if items_per_page == 0 {
        return 0;
    }
    total_items.div_ceil(items_per_page)
}

/// Pagination state over a filtered sequence.
///
/// `current_page` is 1-based and always lies in `1..=max(total_pages, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    current_page: usize,
    items_per_page: usize,
    total_items: usize,
    total_pages: usize,
}

impl Pagination {
    pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

    /// Start on page 1 of `total_items`
    pub fn new(total_items: usize, items_per_page: usize) -> Result<Self, QueryError> {
        if items_per_page == 0 {
            return Err(QueryError::InvalidPageSize(items_per_page));
        }
        Ok(Self {
            current_page: 1,
            items_per_page,
            total_items,
            total_pages: total_pages(total_items, items_per_page),
        })
    }

    /// The underlying sequence changed; back to page 1
    pub fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.total_pages = total_pages(total_items, self.items_per_page);
        self.current_page = 1;
    }

    /// Page size changed; back to page 1
    pub fn set_items_per_page(&mut self, items_per_page: usize) -> Result<(), QueryError> {
        if items_per_page == 0 {
            return Err(QueryError::InvalidPageSize(items_per_page));
        }
        self.items_per_page = items_per_page;
        self.total_pages = total_pages(self.total_items, items_per_page);
        self.current_page = 1;
        Ok(())
    }

    /// Advance one page; returns false when already on the last page
    pub fn next_page(&mut self) -> bool {
        if self.current_page < self.total_pages {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page; returns false when already on the first page
    pub fn previous_page(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to `page`; out-of-range requests leave the state unchanged
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page >= 1 && page <= self.total_pages {
            self.current_page = page;
            true
        } else {
            false
        }
    }

    /// Index range of the current page within the sequence
    pub fn range(&self) -> Range<usize> {
        let page = self.current_page.clamp(1, self.total_pages.max(1));
        let start = ((page - 1) * self.items_per_page).min(self.total_items);
        let end = (page * self.items_per_page).min(self.total_items);
        start..end
    }

    /// Slice the current page out of `items`
    pub fn page<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let Range { start, end } = self.range();
        let end = end.min(items.len());
        &items[start.min(end)..end]
    }

    /// "Showing {start}-{end} of {total}", 1-based and inclusive
    pub fn range_label(&self) -> String {
        let Range { start, end } = self.range();
        if self.total_items == 0 {
            return "Showing 0-0 of 0".to_string();
        }
        format!("Showing {}-{} of {}", start + 1, end, self.total_items)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            items_per_page: Self::DEFAULT_ITEMS_PER_PAGE,
            total_items: 0,
            total_pages: 0,
        }
    }
}
