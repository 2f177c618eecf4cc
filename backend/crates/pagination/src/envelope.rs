//! Page envelope returned by listing endpoints.

use serde::{Deserialize, Serialize};

use crate::{PageRequest, SortOrder};

/// A slice of results plus the paging metadata used to produce it.
///
/// Serialises as camelCase JSON:
/// `{"items":[...],"page":1,"pageSize":10,"totalItems":42,"totalPages":5,
/// "sortField":"createdAt","sortOrder":"desc"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    page: u32,
    page_size: u32,
    total_items: u64,
    total_pages: u64,
    sort_field: String,
    sort_order: SortOrder,
}

impl<T> Page<T> {
    /// Wrap `items` with metadata derived from `request` and the total number
    /// of matching records.
    #[must_use]
    pub fn new(items: Vec<T>, request: &PageRequest, total_items: u64) -> Self {
        Self {
            items,
            page: request.page(),
            page_size: request.page_size(),
            total_items,
            total_pages: total_pages(total_items, request.page_size()),
            sort_field: request.sort_field().to_owned(),
            sort_order: request.sort_order(),
        }
    }

    /// A page with no matching records.
    #[must_use]
    pub fn empty(request: &PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the envelope, returning the items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of records matching the query across all pages.
    #[must_use]
    pub const fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Number of pages needed to cover `total_items`.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Sort field applied to the query.
    #[must_use]
    pub fn sort_field(&self) -> &str {
        self.sort_field.as_str()
    }

    /// Sort direction applied to the query.
    #[must_use]
    pub const fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Convert each item while keeping the paging metadata.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let page = PageRequest::default().paginate(vec![1, 2]);
    /// let labels = page.map(|n| n.to_string());
    /// assert_eq!(labels.items(), &["1".to_owned(), "2".to_owned()]);
    /// ```
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
            sort_field: self.sort_field,
            sort_order: self.sort_order,
        }
    }
}

fn total_pages(total_items: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(u64::from(page_size))
}

#[cfg(test)]
mod tests {
    //! Envelope metadata and serialisation coverage.

    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(0, 10, 0)]
    #[case(1, 10, 1)]
    #[case(10, 10, 1)]
    #[case(11, 10, 2)]
    fn total_pages_rounds_up(#[case] total: u64, #[case] size: u32, #[case] expected: u64) {
        assert_eq!(total_pages(total, size), expected);
    }

    #[rstest]
    fn serialises_camel_case_metadata() {
        let request = PageRequest::new(2, 3, "name", SortOrder::Asc).expect("valid request");
        let page = Page::new(vec!["x"], &request, 4);
        let value = serde_json::to_value(&page).expect("serialise page");
        assert_eq!(
            value,
            json!({
                "items": ["x"],
                "page": 2,
                "pageSize": 3,
                "totalItems": 4,
                "totalPages": 2,
                "sortField": "name",
                "sortOrder": "asc",
            })
        );
        assert!(value.get("page_size").is_none());
    }

    #[rstest]
    fn empty_page_has_no_pages() {
        let page: Page<u8> = Page::empty(&PageRequest::default());
        assert_eq!(page.total_items(), 0);
        assert_eq!(page.total_pages(), 0);
    }
}
