// ScanLogs - core/paginate.rs
//
// Page boundaries and navigation state derived from a filtered set size.

use std::ops::Range;

/// One computed page over a non-empty filtered set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number, already clamped into `1..=total_pages`.
    pub number: usize,
    pub total_pages: usize,
    pub page_size: usize,
    /// Size of the filtered set.
    pub total: usize,
    /// First visible index (inclusive).
    pub start: usize,
    /// Last visible index (exclusive).
    pub end: usize,
}

impl Page {
    /// Compute the page for `requested` over `total` rows.
    ///
    /// Returns `None` for an empty set: that is a terminal display state
    /// with no pagination controls, not "page 1 of 1".
    /// A `page_size` of zero is treated as one.
    pub fn compute(total: usize, requested: usize, page_size: usize) -> Option<Page> {
        if total == 0 {
            return None;
        }
        let page_size = page_size.max(1);
        let total_pages = total.div_ceil(page_size).max(1);
        let number = requested.clamp(1, total_pages);
        let start = (number - 1) * page_size;
        let end = (number * page_size).min(total);
        Some(Page {
            number,
            total_pages,
            page_size,
            total,
            start,
            end,
        })
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Rows shown on this page.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn prev_disabled(&self) -> bool {
        self.number == 1
    }

    pub fn next_disabled(&self) -> bool {
        self.number == self.total_pages
    }

    /// `Page P of N • Showing K of T rows`
    pub fn status_line(&self) -> String {
        format!(
            "Page {} of {} • Showing {} of {} rows",
            self.number,
            self.total_pages,
            self.len(),
            self.total
        )
    }
}

/// Page number clamped into the valid range for `total` rows
/// (1 when the set is empty).
pub fn clamp_page(total: usize, requested: usize, page_size: usize) -> usize {
    Page::compute(total, requested, page_size).map_or(1, |p| p.number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forty_five_rows_twenty_per_page() {
        let first = Page::compute(45, 1, 20).unwrap();
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.len(), 20);
        assert!(first.prev_disabled());
        assert!(!first.next_disabled());

        let last = Page::compute(45, 3, 20).unwrap();
        assert_eq!(last.len(), 5);
        assert_eq!(last.range(), 40..45);
        assert!(last.next_disabled());
        assert!(!last.prev_disabled());
    }

    #[test]
    fn test_requested_page_is_clamped() {
        assert_eq!(Page::compute(45, 99, 20).unwrap().number, 3);
        assert_eq!(Page::compute(45, 0, 20).unwrap().number, 1);
        assert_eq!(clamp_page(0, 5, 20), 1);
    }

    #[test]
    fn test_single_page_disables_both() {
        let p = Page::compute(7, 1, 10).unwrap();
        assert_eq!(p.total_pages, 1);
        assert!(p.prev_disabled() && p.next_disabled());
    }

    #[test]
    fn test_exact_multiple() {
        let p = Page::compute(20, 2, 10).unwrap();
        assert_eq!(p.total_pages, 2);
        assert_eq!(p.range(), 10..20);
    }

    #[test]
    fn test_empty_set_has_no_page() {
        assert!(Page::compute(0, 1, 20).is_none());
    }

    #[test]
    fn test_status_line() {
        let p = Page::compute(45, 3, 20).unwrap();
        assert_eq!(p.status_line(), "Page 3 of 3 • Showing 5 of 45 rows");
    }

    #[test]
    fn test_zero_page_size_treated_as_one() {
        let p = Page::compute(3, 2, 0).unwrap();
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.range(), 1..2);
    }
}
