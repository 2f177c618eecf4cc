//! Driving port for account mutations.

use async_trait::async_trait;

use crate::domain::{Account, AccountPatch, CreateAccountInput, Error};

/// Use-case port consumed by the accounts HTTP adapter for writes.
///
/// Every successful call publishes a statistics event on a best-effort
/// basis; publishing failures never reach the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Register a new account for an existing user.
    ///
    /// # Errors
    /// - `invalid_request` when a required field is missing or malformed,
    ///   or when the user cannot be found.
    /// - `conflict` when the slug is taken.
    /// - `service_unavailable` when the user service cannot be reached.
    async fn create(&self, input: CreateAccountInput) -> Result<Account, Error>;

    /// Merge a partial update into the account named by `patch.slug`.
    ///
    /// # Errors
    /// - `invalid_request` when the slug is missing or `id`/`userId` is set.
    /// - `not_found` when no account has the slug.
    async fn update(&self, patch: AccountPatch) -> Result<Account, Error>;

    /// Delete the account with `slug`, returning the removed record.
    ///
    /// # Errors
    /// - `not_found` when no account has the slug.
    async fn delete(&self, slug: &str) -> Result<Account, Error>;
}
