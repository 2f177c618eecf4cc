//! Driving port for statistics reads.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, EventCounts, StatisticsEvent};

/// Use-case port consumed by the statistics HTTP adapter for reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatisticsQuery: Send + Sync {
    /// Page through every stored event.
    async fn list_all(&self, request: PageRequest) -> Result<Page<StatisticsEvent>, Error>;

    /// Page through events with the given type.
    async fn list_by_event_type(
        &self,
        event_type: &str,
        request: PageRequest,
    ) -> Result<Page<StatisticsEvent>, Error>;

    /// Page through events attributed to the given user.
    async fn list_by_user_id(
        &self,
        user_id: &str,
        request: PageRequest,
    ) -> Result<Page<StatisticsEvent>, Error>;

    /// Event counts grouped by type; empty when nothing was recorded.
    async fn event_counts(&self) -> Result<EventCounts, Error>;
}
