//! Recording side of the statistics service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::SubsecRound;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::info;

use crate::domain::paging::ensure_sortable;
use crate::domain::ports::{
    StatisticsCommand, StatisticsQuery, StatisticsRepository, StatisticsRepositoryError,
};
use crate::domain::{
    Error, EventCounts, NewStatisticsEvent, STATISTICS_SORT_FIELDS, StatisticsEvent,
    StatisticsFilter,
};

/// Statistics service implementing [`StatisticsCommand`] and [`StatisticsQuery`].
#[derive(Clone)]
pub struct StatisticsService<R> {
    events: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> StatisticsService<R> {
    /// Wire the service to its event store.
    pub fn new(events: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { events, clock }
    }
}

impl<R> StatisticsService<R>
where
    R: StatisticsRepository,
{
    fn map_repository_error(error: StatisticsRepositoryError) -> Error {
        match error {
            StatisticsRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("statistics repository unavailable: {message}"))
            }
            StatisticsRepositoryError::Query { message } => {
                Error::internal(format!("statistics repository error: {message}"))
            }
            StatisticsRepositoryError::Duplicate { message } => {
                Error::internal(format!("unexpected statistics conflict: {message}"))
            }
        }
    }

    async fn page(
        &self,
        filter: StatisticsFilter,
        request: PageRequest,
    ) -> Result<Page<StatisticsEvent>, Error> {
        ensure_sortable(&request, STATISTICS_SORT_FIELDS)?;
        self.events
            .find_page(&filter, &request)
            .await
            .map_err(Self::map_repository_error)
    }
}

#[async_trait]
impl<R> StatisticsCommand for StatisticsService<R>
where
    R: StatisticsRepository,
{
    async fn record_event(&self, event: NewStatisticsEvent) -> Result<StatisticsEvent, Error> {
        let created_at = self.clock.utc().trunc_subsecs(3);
        let stored = self
            .events
            .insert(event, created_at)
            .await
            .map_err(Self::map_repository_error)?;
        info!(
            event_type = %stored.event_type,
            entity_id = %stored.entity_id,
            "statistics event recorded"
        );
        Ok(stored)
    }
}

#[async_trait]
impl<R> StatisticsQuery for StatisticsService<R>
where
    R: StatisticsRepository,
{
    async fn list_all(&self, request: PageRequest) -> Result<Page<StatisticsEvent>, Error> {
        self.page(StatisticsFilter::default(), request).await
    }

    async fn list_by_event_type(
        &self,
        event_type: &str,
        request: PageRequest,
    ) -> Result<Page<StatisticsEvent>, Error> {
        let filter = StatisticsFilter {
            event_type: Some(event_type.to_owned()),
            user_id: None,
        };
        self.page(filter, request).await
    }

    async fn list_by_user_id(
        &self,
        user_id: &str,
        request: PageRequest,
    ) -> Result<Page<StatisticsEvent>, Error> {
        let filter = StatisticsFilter {
            event_type: None,
            user_id: Some(user_id.to_owned()),
        };
        self.page(filter, request).await
    }

    async fn event_counts(&self) -> Result<EventCounts, Error> {
        self.events
            .count_by_event_type()
            .await
            .map(EventCounts::from)
            .map_err(Self::map_repository_error)
    }
}
