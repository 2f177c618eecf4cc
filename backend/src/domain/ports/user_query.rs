//! Driving port for user reads.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, User, UserFilter};

/// Use-case port consumed by the users HTTP adapter for reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserQuery: Send + Sync {
    /// Page through users matching `filter`.
    async fn list(&self, filter: UserFilter, request: PageRequest) -> Result<Page<User>, Error>;

    /// Fetch one user, failing with `not_found` when absent.
    async fn find_by_id(&self, id: &str) -> Result<User, Error>;
}
