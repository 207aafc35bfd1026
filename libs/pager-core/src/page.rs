use serde::{Deserialize, Serialize};

use crate::PageRequest;

/// One page of results plus the coordinates it was cut with.
///
/// Invariants: `items.len() <= size` and `total >= items.len()`.
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pager<T> {
    pub offset: u64,
    pub size: u64,
    /// Total number of rows matching the query, across all pages.
    pub total: u64,
    pub items: Vec<T>,
}

impl<T> Pager<T> {
    /// Create a new pager with items and paging coordinates.
    pub fn new(offset: u64, size: u64, total: u64, items: Vec<T>) -> Self {
        debug_assert!(items.len() as u64 <= size);
        debug_assert!(total >= items.len() as u64);
        Self {
            offset,
            size,
            total,
            items,
        }
    }

    /// Create an empty pager at the request's effective coordinates.
    pub fn empty(req: &PageRequest) -> Self {
        Self {
            offset: req.offset_or_default(),
            size: req.size_or_default(),
            total: 0,
            items: Vec::new(),
        }
    }

    /// Map items while preserving paging coordinates (domain->DTO mapping
    /// convenience).
    pub fn map_items<U>(self, mut f: impl FnMut(T) -> U) -> Pager<U> {
        Pager {
            offset: self.offset,
            size: self.size,
            total: self.total,
            items: self.items.into_iter().map(&mut f).collect(),
        }
    }

    /// True when this page reaches past the last matching row.
    pub fn is_last(&self) -> bool {
        self.offset + self.items.len() as u64 >= self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_uses_effective_coordinates() {
        let req = PageRequest::new().offset(-1);
        let page: Pager<i32> = Pager::empty(&req);
        assert_eq!(page.offset, 0);
        assert_eq!(page.size, 15);
        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn map_items_preserves_coordinates() {
        let page = Pager::new(3, 2, 10, vec![1, 2]);
        let mapped = page.map_items(|v| v.to_string());
        assert_eq!(mapped.offset, 3);
        assert_eq!(mapped.size, 2);
        assert_eq!(mapped.total, 10);
        assert_eq!(mapped.items, vec!["1", "2"]);
    }

    #[test]
    fn is_last_detection() {
        assert!(Pager::new(8, 5, 10, vec![1, 2]).is_last());
        assert!(!Pager::new(0, 2, 10, vec![1, 2]).is_last());
        // Offset beyond the dataset: empty page is terminal.
        assert!(Pager::<i32>::new(20, 5, 10, vec![]).is_last());
    }

    #[test]
    fn serializes_flat() {
        let page = Pager::new(0, 2, 3, vec![7, 8]);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["offset"], 0);
        assert_eq!(json["size"], 2);
        assert_eq!(json["total"], 3);
        assert_eq!(json["items"], serde_json::json!([7, 8]));
    }
}
