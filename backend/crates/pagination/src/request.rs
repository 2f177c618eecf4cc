//! Validated paging parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Page;

/// Page size applied when the client does not supply one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;
/// Sort field applied when the client does not supply one.
pub const DEFAULT_SORT_FIELD: &str = "createdAt";

/// Direction applied to the sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest values first.
    Asc,
    /// Largest values first.
    #[default]
    Desc,
}

impl SortOrder {
    /// Wire representation of the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Return `true` for [`SortOrder::Asc`].
    #[must_use]
    pub const fn is_ascending(self) -> bool {
        matches!(self, Self::Asc)
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = PageRequestError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if trimmed.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(PageRequestError::InvalidSortOrder {
                value: value.to_owned(),
            })
        }
    }
}

/// Validation failures raised while building a [`PageRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Page numbers start at one.
    #[error("page must be at least 1")]
    PageOutOfRange,
    /// Page size outside `1..=MAX_PAGE_SIZE`.
    #[error("pageSize must be between 1 and {max}")]
    PageSizeOutOfRange {
        /// Largest accepted page size.
        max: u32,
    },
    /// Blank sort field.
    #[error("sortField must not be empty")]
    EmptySortField,
    /// Sort direction other than `asc` or `desc`.
    #[error("sortOrder must be asc or desc, got `{value}`")]
    InvalidSortOrder {
        /// The rejected input.
        value: String,
    },
}

/// Paging parameters for a listing query.
///
/// ## Invariants
/// - `page >= 1`.
/// - `1 <= page_size <= MAX_PAGE_SIZE`.
/// - `sort_field` is trimmed and non-empty.
///
/// # Examples
/// ```
/// use pagination::{PageRequest, SortOrder};
///
/// let request = PageRequest::new(3, 20, "name", SortOrder::Asc).expect("valid request");
/// assert_eq!(request.offset(), 40);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    page: u32,
    page_size: u32,
    sort_field: String,
    sort_order: SortOrder,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort_field: DEFAULT_SORT_FIELD.to_owned(),
            sort_order: SortOrder::default(),
        }
    }
}

impl PageRequest {
    /// Validate and construct a request.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when any invariant is violated.
    pub fn new(
        page: u32,
        page_size: u32,
        sort_field: impl Into<String>,
        sort_order: SortOrder,
    ) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::PageOutOfRange);
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(PageRequestError::PageSizeOutOfRange { max: MAX_PAGE_SIZE });
        }
        let sort_field = sort_field.into();
        let trimmed = sort_field.trim();
        if trimmed.is_empty() {
            return Err(PageRequestError::EmptySortField);
        }
        Ok(Self {
            page,
            page_size,
            sort_field: trimmed.to_owned(),
            sort_order,
        })
    }

    /// Build a request from optional query parameters, filling defaults for
    /// anything the client left out.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when a supplied value is invalid.
    ///
    /// # Examples
    /// ```
    /// use pagination::{DEFAULT_PAGE_SIZE, PageRequest, SortOrder};
    ///
    /// let request = PageRequest::from_parts(Some(2), None, None, Some("ASC")).expect("valid");
    /// assert_eq!(request.page(), 2);
    /// assert_eq!(request.page_size(), DEFAULT_PAGE_SIZE);
    /// assert_eq!(request.sort_order(), SortOrder::Asc);
    /// ```
    pub fn from_parts(
        page: Option<u32>,
        page_size: Option<u32>,
        sort_field: Option<String>,
        sort_order: Option<&str>,
    ) -> Result<Self, PageRequestError> {
        let sort_order = match sort_order {
            Some(raw) => raw.parse()?,
            None => SortOrder::default(),
        };
        Self::new(
            page.unwrap_or(1),
            page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            sort_field.unwrap_or_else(|| DEFAULT_SORT_FIELD.to_owned()),
            sort_order,
        )
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Wire name of the field to sort by.
    #[must_use]
    pub fn sort_field(&self) -> &str {
        self.sort_field.as_str()
    }

    /// Sort direction.
    #[must_use]
    pub const fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Number of items preceding the requested page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Slice an already filtered and sorted collection into a page.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageRequest, SortOrder};
    ///
    /// let request = PageRequest::new(2, 2, "createdAt", SortOrder::Asc).expect("valid");
    /// let page = request.paginate(vec![1, 2, 3, 4, 5]);
    /// assert_eq!(page.items(), &[3, 4]);
    /// assert_eq!(page.total_items(), 5);
    /// assert_eq!(page.total_pages(), 3);
    /// ```
    #[must_use]
    pub fn paginate<T>(&self, items: Vec<T>) -> Page<T> {
        let total_items = u64::try_from(items.len()).unwrap_or(u64::MAX);
        let skip = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(self.page_size).unwrap_or(usize::MAX);
        let page_items = items.into_iter().skip(skip).take(take).collect();
        Page::new(page_items, self, total_items)
    }
}
