//! `StatisticsSink` over the statistics service's `POST /statistics`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::{endpoint, status_message, with_trace_id};
use crate::domain::NewStatisticsEvent;
use crate::domain::ports::{StatisticsSink, StatisticsSinkError};

/// Event publisher for one statistics service base URL.
#[derive(Clone)]
pub struct HttpStatisticsSink {
    client: Client,
    base_url: Url,
}

impl HttpStatisticsSink {
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
impl StatisticsSink for HttpStatisticsSink {
    async fn publish(&self, event: &NewStatisticsEvent) -> Result<(), StatisticsSinkError> {
        let url = endpoint(&self.base_url, &["statistics"])
            .map_err(StatisticsSinkError::transport)?;
        let response = with_trace_id(self.client.post(url))
            .json(event)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }
}

fn map_transport_error(error: reqwest::Error) -> StatisticsSinkError {
    if error.is_timeout() {
        StatisticsSinkError::timeout(error.to_string())
    } else {
        StatisticsSinkError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> StatisticsSinkError {
    StatisticsSinkError::rejected(status.as_u16(), status_message(status, body))
}
