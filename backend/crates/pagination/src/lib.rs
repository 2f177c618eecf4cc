//! Page request and page envelope primitives.
//!
//! Listing endpoints accept a [`PageRequest`] (1-based page number, page
//! size, sort field and direction) and answer with a [`Page`] envelope that
//! carries the matching slice of records plus the paging metadata clients
//! need to request the next slice.
//!
//! Storage adapters translate [`PageRequest::offset`] and
//! [`PageRequest::page_size`] into skip/limit clauses; in-memory adapters can
//! use [`PageRequest::paginate`] on an already filtered and sorted vector.

mod envelope;
mod request;

pub use envelope::Page;
pub use request::{
    DEFAULT_PAGE_SIZE, DEFAULT_SORT_FIELD, MAX_PAGE_SIZE, PageRequest, PageRequestError, SortOrder,
};
