//! Pagination arithmetic.

use std::ops::Range;

/// Number of rows per page. Fixed for the session.
pub const PAGE_SIZE: usize = 10;

/// Number of pages needed for `len` items. Zero when there are no items.
pub fn total_pages(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE)
}

/// Clamps a requested page into `1..=max(1, total)`.
pub fn clamp_page(page: usize, total: usize) -> usize {
    page.clamp(1, total.max(1))
}

/// Index range of `page` (1-indexed) within a list of `len` items.
///
/// Out-of-range pages yield an empty range.
pub fn page_bounds(page: usize, len: usize) -> Range<usize> {
    let start = page.saturating_sub(1).saturating_mul(PAGE_SIZE).min(len);
    let end = start.saturating_add(PAGE_SIZE).min(len);
    start..end
}

/// The slice of `items` shown on `page`.
pub fn page_slice<T>(items: &[T], page: usize) -> &[T] {
    &items[page_bounds(page, items.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(10), 1);
        assert_eq!(total_pages(11), 2);
        assert_eq!(total_pages(25), 3);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(4, 3), 3);
        assert_eq!(clamp_page(5, 0), 1);
    }

    #[test]
    fn test_last_page_is_partial() {
        let items: Vec<usize> = (0..25).collect();

        assert_eq!(page_slice(&items, 1), &items[0..10]);
        assert_eq!(page_slice(&items, 2), &items[10..20]);
        assert_eq!(page_slice(&items, 3), &items[20..25]);
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        let items: Vec<usize> = (0..5).collect();

        assert!(page_slice(&items, 2).is_empty());
        assert!(page_slice(&items, usize::MAX).is_empty());
        assert_eq!(page_bounds(0, 5), 0..5);
    }

    #[test]
    fn test_every_page_within_size() {
        let items: Vec<usize> = (0..37).collect();
        let total = total_pages(items.len());

        for page in 1..=total {
            let slice = page_slice(&items, page);
            assert!(slice.len() <= PAGE_SIZE);
            if page < total {
                assert_eq!(slice.len(), PAGE_SIZE);
            }
        }
    }
}
