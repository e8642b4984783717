//! Pagination arithmetic: page options, clamping, and row windows.
//!
//! Page numbers are 1-indexed throughout. A dataset of `row_count` rows at
//! `page_size` rows per page has `ceil(row_count / page_size)` pages; an
//! empty dataset has zero pages. An out-of-range requested page is clamped
//! to the nearest bound rather than rejected, so a valid dataset never
//! yields an empty window.
//!
//! # Examples
//!
//! ```rust
//! use gridsieve::pagination::{clamp_page, page_options, page_window};
//!
//! // 200 rows at 15 per page: 14 selectable pages
//! let options = page_options(200, 15);
//! assert_eq!(options, (1..=14).collect::<Vec<u64>>());
//!
//! // No rows, no pages
//! assert!(page_options(0, 15).is_empty());
//!
//! // Requested page 99 of 14 clamps to the last page
//! assert_eq!(clamp_page(99, 14), 14);
//! assert_eq!(clamp_page(0, 14), 1);
//!
//! // Row window for page 3 of 10-per-page over 25 rows
//! assert_eq!(page_window(3, 10, 25), (20, 25));
//! ```

/// The selectable page numbers for `row_count` rows at `page_size` per page.
///
/// Returns `[1..=ceil(row_count / page_size)]`; empty when there are no
/// rows. A zero `page_size` is a caller error — the builder rejects it
/// before a statement can carry one.
pub fn page_options(row_count: u64, page_size: u64) -> Vec<u64> {
    debug_assert!(page_size > 0, "page_size must be positive");
    if row_count == 0 || page_size == 0 {
        return Vec::new();
    }
    (1..=row_count.div_ceil(page_size)).collect()
}

/// Clamp a requested page into `[1, num_pages]`.
///
/// A page below 1 becomes 1; a page past the end becomes the last page.
/// With zero pages the result is 1, for a window that is simply empty.
pub fn clamp_page(page: u64, num_pages: u64) -> u64 {
    page.clamp(1, num_pages.max(1))
}

/// The `[start, end)` row indices for a page, after clamping.
///
/// Suitable for slicing a materialized row set; `end` never exceeds
/// `row_count`.
pub fn page_window(page: u64, page_size: u64, row_count: u64) -> (usize, usize) {
    debug_assert!(page_size > 0, "page_size must be positive");
    if page_size == 0 {
        return (0, 0);
    }
    let num_pages = row_count.div_ceil(page_size);
    let page = clamp_page(page, num_pages);
    let start = (page - 1).saturating_mul(page_size).min(row_count);
    let end = start.saturating_add(page_size).min(row_count);
    (start as usize, end as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_options_exact_and_ragged() {
        assert_eq!(page_options(30, 10), vec![1, 2, 3]);
        assert_eq!(page_options(31, 10), vec![1, 2, 3, 4]);
        assert_eq!(page_options(200, 15).len(), 14);
    }

    #[test]
    fn test_page_options_empty_dataset() {
        assert_eq!(page_options(0, 10), Vec::<u64>::new());
    }

    #[test]
    fn test_page_options_fewer_rows_than_page() {
        assert_eq!(page_options(3, 10), vec![1]);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 5), 1);
        assert_eq!(clamp_page(1, 5), 1);
        assert_eq!(clamp_page(5, 5), 5);
        assert_eq!(clamp_page(6, 5), 5);
        assert_eq!(clamp_page(3, 0), 1);
    }

    #[test]
    fn test_page_window() {
        assert_eq!(page_window(1, 10, 25), (0, 10));
        assert_eq!(page_window(3, 10, 25), (20, 25));
        // out-of-range page clamps to the last page
        assert_eq!(page_window(9, 10, 25), (20, 25));
        // empty dataset yields an empty window
        assert_eq!(page_window(1, 10, 0), (0, 0));
    }
}
