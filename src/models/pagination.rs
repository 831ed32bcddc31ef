use serde::{Deserialize, Serialize};

/// Current pagination window, owned by the calling UI layer. Recomputed
/// per scan, never persisted. Only explicit page changes and the recovery
/// controller's single page-1 fallback may mutate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    /// 1-based page number.
    pub current_page: usize,
    pub items_per_page: usize,
}

impl PaginationState {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            current_page: 1,
            items_per_page: items_per_page.max(1),
        }
    }

    pub fn with_page(page: usize, items_per_page: usize) -> Self {
        Self {
            current_page: page.max(1),
            items_per_page: items_per_page.max(1),
        }
    }

    /// Row offset of the current window.
    pub fn offset(&self) -> usize {
        (self.current_page - 1) * self.items_per_page
    }

    /// Snap back to page 1, keeping the page size. Used by the recovery
    /// controller when a forward page turned out to be past the end of
    /// the result set.
    pub fn reset_to_first_page(&mut self) {
        self.current_page = 1;
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_LIMIT)
    }
}
