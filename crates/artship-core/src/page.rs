//! The backend's pageable list envelope.

use serde::Deserialize;

/// One page of a paginated listing.
///
/// Every field defaults so partial envelopes (older endpoints omit the
/// bookkeeping columns) still deserialize.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    /// Zero-based page index.
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub last: bool,
}

impl<T> Page<T> {
    /// Maps the page contents, dropping entries the mapper rejects.
    ///
    /// Used to run normalization over a page of raw records without
    /// failing the whole page on one malformed row.
    pub fn filter_map<U>(self, f: impl FnMut(T) -> Option<U>) -> Page<U> {
        Page {
            content: self.content.into_iter().filter_map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            last: self.last,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_envelope_deserializes() {
        let page: Page<i64> = serde_json::from_str(r#"{"content": [1, 2, 3]}"#).unwrap();
        assert_eq!(page.content, vec![1, 2, 3]);
        assert_eq!(page.number, 0);
        assert!(!page.last);
    }

    #[test]
    fn test_empty_object_deserializes() {
        let page: Page<String> = serde_json::from_str("{}").unwrap();
        assert!(page.is_empty());
        assert_eq!(page.len(), 0);
    }

    #[test]
    fn test_filter_map_drops_rejected_rows() {
        let page: Page<i64> = serde_json::from_str(
            r#"{"content": [1, 2, 3], "totalElements": 3, "last": true}"#,
        )
        .unwrap();
        let mapped = page.filter_map(|n| (n % 2 == 1).then_some(n * 10));
        assert_eq!(mapped.content, vec![10, 30]);
        assert_eq!(mapped.total_elements, 3);
        assert!(mapped.last);
    }
}
