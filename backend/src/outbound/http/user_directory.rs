//! `UserDirectory` over the user service's `GET /users/{id}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::{endpoint, status_message, with_trace_id};
use crate::domain::UserId;
use crate::domain::ports::{UserDirectory, UserDirectoryError, UserSummary};

/// User lookups against one user service base URL.
#[derive(Clone)]
pub struct HttpUserDirectory {
    client: Client,
    base_url: Url,
}

impl HttpUserDirectory {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn find_user(&self, id: &UserId) -> Result<Option<UserSummary>, UserDirectoryError> {
        let url = endpoint(&self.base_url, &["users", id.as_ref()])
            .map_err(UserDirectoryError::transport)?;
        let response = with_trace_id(self.client.get(url))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(user_id = %id, "user service reported unknown user");
            return Ok(None);
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_summary(body.as_ref()).map(Some)
    }
}

fn parse_summary(body: &[u8]) -> Result<UserSummary, UserDirectoryError> {
    serde_json::from_slice(body).map_err(|error| {
        UserDirectoryError::decode(format!("invalid user payload: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> UserDirectoryError {
    if error.is_timeout() {
        UserDirectoryError::timeout(error.to_string())
    } else {
        UserDirectoryError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> UserDirectoryError {
    let message = status_message(status, body);
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            UserDirectoryError::timeout(message)
        }
        _ => UserDirectoryError::status(status.as_u16(), message),
    }
}
