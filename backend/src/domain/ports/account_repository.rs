//! Port abstraction for account persistence adapters and their errors.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Account, AccountDraft, AccountFilter, AccountId, Slug};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// A unique index rejected the write.
        Duplicate { message: String } => "account repository rejected duplicate: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Fetch an account by its slug.
    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Account>, AccountRepositoryError>;

    /// Fetch an account by its store-assigned identifier.
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError>;

    /// Return one page of accounts matching `filter`, ordered per `request`.
    async fn find_page(
        &self,
        filter: &AccountFilter,
        request: &PageRequest,
    ) -> Result<Page<Account>, AccountRepositoryError>;

    /// Insert a draft without an id, replace the record otherwise.
    async fn save(&self, draft: AccountDraft) -> Result<Account, AccountRepositoryError>;

    /// Remove the account; `false` when nothing matched.
    async fn delete(&self, id: &AccountId) -> Result<bool, AccountRepositoryError>;
}
