//! Paginated responses.
//!
//! List endpoints return one [`Page`] per request. The page math
//! (`has_next_page`, `total_pages`) is derived from the page's own counters
//! only; the client's page stream trusts each page independently, so a
//! `total` that moves between fetches (concurrent writes) is tolerated
//! rather than reconciled.

use serde::{Deserialize, Serialize};

/// One page of a paginated listing.
///
/// `page` is 1-based; item order is whatever the server returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, in server order.
    pub items: Vec<T>,
    /// Total item count across all pages, as of this fetch.
    pub total: u64,
    /// This page's 1-based number.
    pub page: u32,
    /// Requested page size.
    pub page_size: u32,
}

impl<T> Page<T> {
    /// Whether a page after this one exists.
    pub fn has_next_page(&self) -> bool {
        u64::from(self.page) * u64::from(self.page_size) < self.total
    }

    /// Whether a page before this one exists.
    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }

    /// Number of pages needed to cover `total` items.
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size))
    }
}
