//! Driving port for recording statistics events.

use async_trait::async_trait;

use crate::domain::{Error, NewStatisticsEvent, StatisticsEvent};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatisticsCommand: Send + Sync {
    /// Append an event; missing metadata is stored as `{}`.
    async fn record_event(&self, event: NewStatisticsEvent) -> Result<StatisticsEvent, Error>;
}
