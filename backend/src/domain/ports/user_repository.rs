//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{User, UserDraft, UserFilter, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique index rejected the write.
        Duplicate { message: String } => "user repository rejected duplicate: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError>;

    /// Return one page of users matching `filter`, ordered per `request`.
    async fn find_page(
        &self,
        filter: &UserFilter,
        request: &PageRequest,
    ) -> Result<Page<User>, UserRepositoryError>;

    /// Insert a draft without an id, replace the record otherwise.
    async fn save(&self, draft: UserDraft) -> Result<User, UserRepositoryError>;

    /// Remove the user; `false` when nothing matched.
    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError>;
}
