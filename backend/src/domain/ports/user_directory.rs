//! Port for resolving user references against the user service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised while looking a user up remotely.
    pub enum UserDirectoryError {
        /// The request never produced a response.
        Transport { message: String } => "user lookup transport failed: {message}",
        /// The request exceeded the configured timeout.
        Timeout { message: String } => "user lookup timed out: {message}",
        /// The user service answered with an unexpected status.
        Status { status: u16, message: String } => "user lookup returned status {status}: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "user lookup response was malformed: {message}",
    }
}

/// The subset of a remote user record needed to confirm a reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look a user up by id. `Ok(None)` means the directory answered that
    /// no such user exists.
    async fn find_user(&self, id: &UserId) -> Result<Option<UserSummary>, UserDirectoryError>;
}
