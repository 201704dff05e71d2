use std::ops::Range;

use serde::Serialize;

/// Position within a paginated view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// Zero-based page index, already clamped into range.
    pub index: usize,
    /// At least one, even for an empty list.
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
}

impl PageInfo {
    pub fn has_prev(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.total_pages
    }
}

/// Clamp `page` into range and return the slice bounds for it.
pub fn paginate(total: usize, page_size: usize, page: usize) -> (PageInfo, Range<usize>) {
    let page_size = page_size.max(1);
    let total_pages = total.div_ceil(page_size).max(1);
    let index = page.min(total_pages - 1);

    let start = (index * page_size).min(total);
    let end = (start + page_size).min(total);

    (
        PageInfo {
            index,
            total_pages,
            total_items: total,
            page_size,
        },
        start..end,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thirteen_items_in_pages_of_five() {
        let (info, range) = paginate(13, 5, 2);
        assert_eq!(info.total_pages, 3);
        assert_eq!(range.len(), 3);
        assert_eq!(range, 10..13);
        assert!(info.has_prev());
        assert!(!info.has_next());
    }

    #[test]
    fn test_empty_has_one_page() {
        let (info, range) = paginate(0, 10, 0);
        assert_eq!(info.total_pages, 1);
        assert_eq!(info.index, 0);
        assert!(range.is_empty());
        assert!(!info.has_prev());
        assert!(!info.has_next());
    }

    #[test]
    fn test_out_of_range_page_is_clamped() {
        let (info, range) = paginate(13, 5, 99);
        assert_eq!(info.index, 2);
        assert_eq!(range, 10..13);
    }

    #[test]
    fn test_exact_multiple() {
        let (info, range) = paginate(10, 5, 1);
        assert_eq!(info.total_pages, 2);
        assert_eq!(range, 5..10);
    }
}
