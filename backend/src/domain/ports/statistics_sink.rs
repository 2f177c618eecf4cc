//! Port for publishing statistics events to the statistics service.
//!
//! Callers never talk to a sink directly; they go through
//! [`crate::domain::StatisticsEmitter`], which swallows every failure.

use async_trait::async_trait;

use crate::domain::NewStatisticsEvent;

use super::define_port_error;

define_port_error! {
    /// Errors raised while publishing a statistics event.
    pub enum StatisticsSinkError {
        /// The request never produced a response.
        Transport { message: String } => "statistics publish transport failed: {message}",
        /// The request exceeded the configured timeout.
        Timeout { message: String } => "statistics publish timed out: {message}",
        /// The statistics service answered with a non-success status.
        Rejected { status: u16, message: String } => "statistics publish rejected with status {status}: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatisticsSink: Send + Sync {
    /// Deliver one event.
    async fn publish(&self, event: &NewStatisticsEvent) -> Result<(), StatisticsSinkError>;
}
