//! Paging query parameters shared by the listing endpoints.

use pagination::{PageRequest, PageRequestError};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::domain::Error;

/// `?page=&pageSize=&sortField=&sortOrder=` query string.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct PageQuery {
    /// 1-based page number, default 1.
    pub page: Option<u32>,
    /// Items per page, default 10, max 100.
    pub page_size: Option<u32>,
    /// Field to sort by, default `createdAt`.
    pub sort_field: Option<String>,
    /// `asc` or `desc`, default `desc`.
    pub sort_order: Option<String>,
}

impl PageQuery {
    /// Validate the parameters into a [`PageRequest`].
    pub fn into_page_request(self) -> Result<PageRequest, Error> {
        PageRequest::from_parts(
            self.page,
            self.page_size,
            self.sort_field,
            self.sort_order.as_deref(),
        )
        .map_err(map_page_request_error)
    }
}

fn map_page_request_error(error: PageRequestError) -> Error {
    let field = match &error {
        PageRequestError::PageOutOfRange => "page",
        PageRequestError::PageSizeOutOfRange { .. } => "pageSize",
        PageRequestError::EmptySortField => "sortField",
        PageRequestError::InvalidSortOrder { .. } => "sortOrder",
    };
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": field,
        "code": "invalid_paging",
    }))
}
