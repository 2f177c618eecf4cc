//! Driving port for account reads.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Account, AccountFilter, Error};

/// Use-case port consumed by the accounts HTTP adapter for reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// Page through accounts matching `filter`.
    async fn list(&self, filter: AccountFilter, request: PageRequest)
    -> Result<Page<Account>, Error>;

    /// Fetch one account by slug, failing with `not_found` when absent.
    async fn get_by_slug(&self, slug: &str) -> Result<Account, Error>;
}
