//! Offset/limit pagination.

use serde::{Deserialize, Serialize};

/// A window over an ordered sequence.
///
/// Slicing saturates at the sequence bounds: an offset past the end yields an
/// empty result, never an error. A `limit` of `None` means "until the end".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub offset: usize,

    #[serde(default)]
    pub limit: Option<usize>,
}

impl Page {
    pub fn new(offset: usize, limit: Option<usize>) -> Self {
        Self { offset, limit }
    }

    /// The whole sequence.
    pub fn all() -> Self {
        Self::default()
    }

    /// Apply this window to an already ordered sequence.
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_matches_slice() {
        let items = vec!["a", "b", "c", "d", "e"];
        for offset in 0..7 {
            for limit in 0..7 {
                let expected: Vec<&str> = items
                    .iter()
                    .copied()
                    .skip(offset)
                    .take(limit)
                    .collect();
                let page = Page::new(offset, Some(limit));
                assert_eq!(page.apply(items.clone()), expected);
            }
        }
    }

    #[test]
    fn test_offset_past_end_is_empty() {
        let page = Page::new(10, None);
        assert!(page.apply(vec![1, 2, 3]).is_empty());
    }

    #[test]
    fn test_all_returns_everything() {
        assert_eq!(Page::all().apply(vec![1, 2, 3]), vec![1, 2, 3]);
    }
}
