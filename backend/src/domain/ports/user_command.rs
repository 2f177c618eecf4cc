//! Driving port for user mutations.

use async_trait::async_trait;

use crate::domain::{CreateUserInput, Error, User, UserPatch};

/// Use-case port consumed by the users HTTP adapter for writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCommand: Send + Sync {
    /// Register a user; `isActive` defaults to true.
    ///
    /// # Errors
    /// - `invalid_request` when email or names are missing or malformed.
    /// - `conflict` when the email is already registered.
    async fn create(&self, input: CreateUserInput) -> Result<User, Error>;

    /// Merge a partial update into the user named by `patch.id`.
    ///
    /// # Errors
    /// - `invalid_request` when `id` is missing.
    /// - `not_found` when no user has the id.
    /// - `conflict` when the new email belongs to another user.
    async fn update(&self, patch: UserPatch) -> Result<User, Error>;

    /// Delete the user, returning the removed record.
    async fn delete(&self, id: &str) -> Result<User, Error>;

    /// Set `isActive` to true through [`UserCommand::update`].
    async fn activate(&self, id: &str) -> Result<User, Error>;

    /// Set `isActive` to false through [`UserCommand::update`].
    async fn deactivate(&self, id: &str) -> Result<User, Error>;
}
