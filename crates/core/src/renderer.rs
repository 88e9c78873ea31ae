//! Page source abstraction
//!
//! Rasterizing pages is the host's job. The engine only asks how many pages
//! exist and how large each one is.

use crate::geometry::PageSize;

pub trait PageRenderer {
    fn page_count(&self) -> usize;

    /// Size of a page in document units, if known
    fn page_size(&self, page: usize) -> Option<PageSize>;
}

/// Page renderer backed by a fixed list of page sizes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticPages {
    sizes: Vec<PageSize>,
}

impl StaticPages {
    pub fn new(sizes: Vec<PageSize>) -> Self {
        Self { sizes }
    }

    /// `count` pages of the same size
    pub fn uniform(count: usize, size: PageSize) -> Self {
        Self {
            sizes: vec![size; count],
        }
    }

    pub fn sizes(&self) -> &[PageSize] {
        &self.sizes
    }
}

impl PageRenderer for StaticPages {
    fn page_count(&self) -> usize {
        self.sizes.len()
    }

    fn page_size(&self, page: usize) -> Option<PageSize> {
        self.sizes.get(page).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_pages() {
        let pages = StaticPages::new(vec![PageSize::default(), PageSize::new(100.0, 200.0)]);
        assert_eq!(pages.page_count(), 2);
        assert_eq!(pages.page_size(1), Some(PageSize::new(100.0, 200.0)));
        assert_eq!(pages.page_size(2), None);
    }

    #[test]
    fn test_uniform_pages() {
        let pages = StaticPages::uniform(3, PageSize::default());
        assert_eq!(pages.page_count(), 3);
        assert!(pages.sizes().iter().all(|size| *size == PageSize::default()));
    }
}
