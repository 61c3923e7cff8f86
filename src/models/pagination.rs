// models/pagination.rs
// Offset pagination input and derived page information

use serde::{Deserialize, Serialize};

/// Requested page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PaginationInput {
    /// Number of items per page
    pub take: u32,
    /// Number of items to skip
    #[serde(default)]
    pub skip: u64,
}

/// Page information returned alongside a list of offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub per_page: u32,
    pub page: u64,
    pub total_pages: u64,
    pub total_items: u64,
}

impl PaginationInput {
    /// Derives page information for this window over `total_items`.
    ///
    /// `take` must be non-zero; callers validate it before querying.
    pub fn pagination_info(&self, per_page: u32, total_items: u64) -> PaginationInfo {
        let take = u64::from(self.take.max(1));
        let total_pages = total_items.div_ceil(take);
        let page = self.skip.div_ceil(take) + 1;

        PaginationInfo {
            has_previous_page: page > 1,
            has_next_page: page < total_pages,
            per_page,
            page,
            total_pages,
            total_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page() {
        let input = PaginationInput { take: 10, skip: 0 };
        let info = input.pagination_info(10, 25);
        assert_eq!(info.page, 1);
        assert_eq!(info.total_pages, 3);
        assert!(!info.has_previous_page);
        assert!(info.has_next_page);
    }

    #[test]
    fn test_last_page() {
        let input = PaginationInput { take: 10, skip: 20 };
        let info = input.pagination_info(5, 25);
        assert_eq!(info.page, 3);
        assert_eq!(info.per_page, 5);
        assert!(info.has_previous_page);
        assert!(!info.has_next_page);
    }

    #[test]
    fn test_unaligned_skip_rounds_up() {
        // skip 5 of take 10 lands on the second page
        let input = PaginationInput { take: 10, skip: 5 };
        assert_eq!(input.pagination_info(10, 100).page, 2);
    }

    #[test]
    fn test_empty_table() {
        let input = PaginationInput { take: 10, skip: 0 };
        let info = input.pagination_info(0, 0);
        assert_eq!(info.total_pages, 0);
        assert_eq!(info.page, 1);
        assert!(!info.has_next_page);
    }
}
