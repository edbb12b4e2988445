//! Vantage Page Slicer
//!
//! Deterministic pagination over an ordered sequence. Out-of-range pages are
//! empty, never errors.
//!
//! @version 0.1.0
//! @author Vantage Development Team

use serde::{Deserialize, Serialize};

// =============================================================================
// Page
// =============================================================================

/// One page of an ordered result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number.
    pub page_number: usize,
    pub page_size: usize,
    /// Size of the full (filtered) sequence before slicing.
    pub total_count: usize,
}

impl<T> Page<T> {
    pub fn empty(page_number: usize, page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            page_number,
            page_size,
            total_count: 0,
        }
    }

    /// Number of pages needed for `total_count` items.
    pub fn total_pages(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(self.page_size)
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Transform the items while keeping the paging metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_count: self.total_count,
        }
    }
}

// =============================================================================
// Paginate
// =============================================================================

/// Slice `items` into the requested page. Page 0 is read as page 1 and a page
/// size of 0 produces an empty page.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let page_number = page.max(1);
    let total_count = items.len();

    if page_size == 0 {
        return Page {
            items: Vec::new(),
            page_number,
            page_size,
            total_count,
        };
    }

    let start = (page_number - 1).saturating_mul(page_size);
    let items = items.into_iter().skip(start).take(page_size).collect();

    Page {
        items,
        page_number,
        page_size,
        total_count,
    }
}

// =============================================================================
// Tests
// =============================================================================
