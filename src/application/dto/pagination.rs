use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize",
    deserialize = "T: serde::de::DeserializeOwned"
))]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(u64::from(per_page))
        };
        Self {
            items,
            page,
            per_page,
            total,
            total_pages,
        }
    }

    pub fn has_more(&self) -> bool {
        u64::from(self.page) < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let page = Page::new(vec![1, 2, 3, 4, 5, 6], 1, 6, 13);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_more());
        let last = Page::<u8>::new(vec![], 3, 6, 13);
        assert!(!last.has_more());
        assert_eq!(Page::<u8>::new(vec![], 1, 6, 0).total_pages, 0);
    }
}
