//! Pages and pure pagination math.

use std::sync::Arc;

/// An immutable slice of at most `per_page` entries.
#[derive(Debug)]
pub struct Page<T> {
    index: usize,
    items: Arc<[T]>,
}

impl<T> Clone for Page<T> {
    fn clone(&self) -> Self {
        Self {
            index: self.index,
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> Page<T> {
    pub fn new(index: usize, items: Vec<T>) -> Self {
        Self {
            index,
            items: items.into(),
        }
    }

    /// Zero-based page index.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Number of pages needed for `item_count` entries. Never less than one.
pub fn total_pages(item_count: usize, per_page: usize) -> usize {
    item_count.div_ceil(per_page.max(1)).max(1)
}

/// Clamp a zero-based page index into `[0, max_pages - 1]`.
pub fn clamp_page(index: usize, max_pages: usize) -> usize {
    index.min(max_pages.max(1) - 1)
}

/// Global offset of the first entry on a page.
pub fn page_start(index: usize, per_page: usize) -> usize {
    index.saturating_mul(per_page.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up_and_keeps_one_empty_page() {
        assert_eq!(total_pages(5, 2), 3);
        assert_eq!(total_pages(4, 2), 2);
        assert_eq!(total_pages(0, 2), 1);
        assert_eq!(total_pages(3, 0), 3);
    }

    #[test]
    fn clamp_page_saturates_at_bounds() {
        assert_eq!(clamp_page(0, 3), 0);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(9, 3), 2);
        assert_eq!(clamp_page(4, 0), 0);
    }

    #[test]
    fn page_clone_shares_items() {
        let page = Page::new(1, vec!["c", "d"]);
        let copy = page.clone();
        assert_eq!(copy.index(), 1);
        assert_eq!(copy.items(), ["c", "d"]);
        assert_eq!(page_start(copy.index(), 2), 2);
    }
}
