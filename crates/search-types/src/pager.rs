//! Page arithmetic and pager metadata.
//!
//! The visible page numbers use a sliding window: a block of
//! `pages_per_set` pages centered on the current page as far as the
//! bounds `[1, total_pages]` allow.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Pager metadata for one page of a result set.
///
/// All page numbers and entry numbers are 1-based. `first_entry` and
/// `last_entry` are 0 when the current page holds no entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pager {
    pub total_entries: u64,
    pub entries_per_page: u64,
    pub current_page: u64,
    pub pages_per_set: u64,
    pub total_pages: u64,
    pub first_page_of_set: u64,
    pub last_page_of_set: u64,
    pub first_entry: u64,
    pub last_entry: u64,
}

impl Pager {
    /// Build pager metadata.
    ///
    /// Returns None when `entries_per_page` is 0: an unpaginated result has
    /// no pager. A `current_page` past the last page still produces valid
    /// metadata with an empty entry range.
    pub fn new(
        total_entries: u64,
        entries_per_page: u64,
        current_page: u64,
        pages_per_set: u64,
    ) -> Option<Self> {
        if entries_per_page == 0 {
            return None;
        }

        let current_page = current_page.max(1);
        let pages_per_set = pages_per_set.max(1);
        let total_pages = total_entries.div_ceil(entries_per_page);
        let (first_page_of_set, last_page_of_set) =
            sliding_window(total_pages, current_page, pages_per_set);

        let offset = (current_page - 1).saturating_mul(entries_per_page);
        let (first_entry, last_entry) = if offset < total_entries {
            (
                offset + 1,
                offset.saturating_add(entries_per_page).min(total_entries),
            )
        } else {
            (0, 0)
        };

        Some(Self {
            total_entries,
            entries_per_page,
            current_page,
            pages_per_set,
            total_pages,
            first_page_of_set,
            last_page_of_set,
            first_entry,
            last_entry,
        })
    }

    /// Zero-based offset of the first entry of the current page.
    pub fn offset(&self) -> u64 {
        (self.current_page - 1).saturating_mul(self.entries_per_page)
    }

    /// Number of entries on the current page.
    pub fn entries_on_this_page(&self) -> u64 {
        if self.first_entry == 0 {
            0
        } else {
            self.last_entry - self.first_entry + 1
        }
    }

    pub fn previous_page(&self) -> Option<u64> {
        (self.current_page > 1).then(|| self.current_page - 1)
    }

    pub fn next_page(&self) -> Option<u64> {
        (self.current_page < self.total_pages).then(|| self.current_page + 1)
    }

    /// Page numbers in the visible window (empty when there are no pages).
    pub fn pages_in_set(&self) -> RangeInclusive<u64> {
        if self.total_pages == 0 {
            return RangeInclusive::new(1, 0);
        }
        self.first_page_of_set..=self.last_page_of_set
    }

    /// Whether the requested page lies past the last page.
    pub fn is_out_of_range(&self) -> bool {
        self.current_page > self.total_pages
    }
}

fn sliding_window(total_pages: u64, current_page: u64, pages_per_set: u64) -> (u64, u64) {
    if total_pages == 0 {
        return (0, 0);
    }

    let size = pages_per_set.min(total_pages);
    let anchor = current_page.min(total_pages);
    let latest_start = total_pages - size + 1;
    let first = anchor.saturating_sub(size / 2).max(1).min(latest_start);

    (first, first + size - 1)
}
