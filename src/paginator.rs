//! Pagination control for the cached resource tables.
//!
//! The paginator tracks a **1-based** page cursor over a list whose length is
//! known only up to the fetch frontier. It does not render rows or read keys;
//! it computes slice bounds and renders the control itself, either as Arabic
//! numerals (`"2/5"`) or as dots (`"○ • ○"`).
//!
//! Growing lists use [`open_ended_pages`] to size the control: when the loaded
//! length is an exact multiple of the page size, one extra page is offered so
//! that stepping onto it can trigger the next server fetch.

use serde::{Deserialize, Serialize};

/// The type of pagination to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    /// Display pagination as Arabic numerals (e.g., "1/5").
    #[default]
    Arabic,
    /// Display pagination as dots (e.g., "• ○ ○ ○ ○").
    Dots,
}

/// Number of pages for a list that may still grow on the server side.
///
/// This is `ceil(items / per_page)`, plus one extra page whenever `items` is
/// an exact multiple of `per_page` (zero included). The extra page is the one
/// whose selection asks the server for more data.
///
/// # Examples
///
/// ```rust
/// use bubbletea_pagecache::paginator::open_ended_pages;
///
/// assert_eq!(open_ended_pages(0, 10), 1);
/// assert_eq!(open_ended_pages(3, 2), 2);
/// assert_eq!(open_ended_pages(4, 2), 3);
/// ```
pub fn open_ended_pages(items: usize, per_page: usize) -> usize {
    let per_page = per_page.max(1);
    let pages = items.div_ceil(per_page);
    if items % per_page == 0 {
        pages + 1
    } else {
        pages
    }
}

/// Number of pages for a list whose contents are complete (at least one).
pub fn closed_pages(items: usize, per_page: usize) -> usize {
    items.div_ceil(per_page.max(1)).max(1)
}

/// A paginator model for handling pagination state and rendering.
///
/// Pages are numbered from 1, matching what the user sees.
///
/// # Examples
///
/// ```rust
/// use bubbletea_pagecache::paginator::Model;
///
/// let mut paginator = Model::new().with_per_page(10);
/// paginator.set_total_items(95);
/// assert_eq!(paginator.total_pages, 10);
/// assert_eq!(paginator.page, 1);
///
/// assert!(paginator.go_to(2));
/// assert_eq!(paginator.page, 2);
/// assert!(!paginator.go_to(11));
/// ```
#[derive(Debug, Clone)]
pub struct Model {
    /// The type of pagination to display (Dots or Arabic).
    pub paginator_type: Type,
    /// The current page, starting at 1.
    pub page: usize,
    /// The number of items per page.
    pub per_page: usize,
    /// The total number of pages.
    pub total_pages: usize,

    /// The character to use for the active page in Dots mode.
    pub active_dot: String,
    /// The character to use for inactive pages in Dots mode.
    pub inactive_dot: String,
    /// The format string for Arabic mode (e.g., "%d/%d").
    pub arabic_format: String,
}

impl Default for Model {
    /// Arabic display, page 1 of 1, one item per page.
    fn default() -> Self {
        Self {
            paginator_type: Type::default(),
            page: 1,
            per_page: 1,
            total_pages: 1,
            active_dot: "•".to_string(),
            inactive_dot: "○".to_string(),
            arabic_format: "%d/%d".to_string(),
        }
    }
}

impl Model {
    /// Creates a new paginator model with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of items per page (builder pattern). Clamped to at least 1.
    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.set_per_page(per_page);
        self
    }

    /// Sets the display type (builder pattern).
    pub fn with_type(mut self, paginator_type: Type) -> Self {
        self.paginator_type = paginator_type;
        self
    }

    /// Sets the number of items per page. Clamped to at least 1.
    pub fn set_per_page(&mut self, per_page: usize) {
        self.per_page = per_page.max(1);
    }

    /// Sets the total number of pages directly (minimum 1) and pulls the
    /// current page back inside the new range.
    ///
    /// ```rust
    /// use bubbletea_pagecache::paginator::Model;
    ///
    /// let mut paginator = Model::new();
    /// paginator.set_total_pages(10);
    /// paginator.page = 9;
    /// paginator.set_total_pages(5);
    /// assert_eq!(paginator.page, 5);
    /// ```
    pub fn set_total_pages(&mut self, pages: usize) {
        self.total_pages = pages.max(1);
        self.page = self.page.clamp(1, self.total_pages);
    }

    /// Sizes the paginator for a complete list of `items`.
    pub fn set_total_items(&mut self, items: usize) {
        self.set_total_pages(closed_pages(items, self.per_page));
    }

    /// Sizes the paginator for a list that can still grow past `items`.
    pub fn set_open_ended_items(&mut self, items: usize) {
        self.set_total_pages(open_ended_pages(items, self.per_page));
    }

    /// Moves to `page` if it lies within `1..=total_pages`. Returns whether
    /// the page changed.
    pub fn go_to(&mut self, page: usize) -> bool {
        if page == 0 || page > self.total_pages || page == self.page {
            return false;
        }
        self.page = page;
        true
    }

    /// Renders the paginator as a string.
    pub fn view(&self) -> String {
        match self.paginator_type {
            Type::Arabic => self.arabic_view(),
            Type::Dots => self.dots_view(),
        }
    }

    fn arabic_view(&self) -> String {
        self.arabic_format
            .replacen("%d", &self.page.to_string(), 1)
            .replacen("%d", &self.total_pages.to_string(), 1)
    }

    fn dots_view(&self) -> String {
        (1..=self.total_pages)
            .map(|i| {
                if i == self.page {
                    self.active_dot.as_str()
                } else {
                    self.inactive_dot.as_str()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Slice bounds of 1-based `page` within a list of `length` items. Pages past
/// the end yield an empty range at `length`.
pub fn slice_bounds(page: usize, per_page: usize, length: usize) -> (usize, usize) {
    let per_page = per_page.max(1);
    let start = page.saturating_sub(1).saturating_mul(per_page).min(length);
    let end = start.saturating_add(per_page).min(length);
    (start, end)
}
