//! Port abstraction for the append-only statistics store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{NewStatisticsEvent, StatisticsEvent, StatisticsFilter};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by statistics repository adapters.
    pub enum StatisticsRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "statistics repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "statistics repository query failed: {message}",
        /// A unique index rejected the write.
        Duplicate { message: String } => "statistics repository rejected duplicate: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatisticsRepository: Send + Sync {
    /// Return one page of events matching `filter`, ordered per `request`.
    async fn find_page(
        &self,
        filter: &StatisticsFilter,
        request: &PageRequest,
    ) -> Result<Page<StatisticsEvent>, StatisticsRepositoryError>;

    /// Append a new event stamped with `created_at`.
    async fn insert(
        &self,
        event: NewStatisticsEvent,
        created_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<StatisticsEvent, StatisticsRepositoryError>;

    /// Count stored events grouped by event type. Implementations must
    /// aggregate in the store rather than loading every record.
    async fn count_by_event_type(&self) -> Result<BTreeMap<String, u64>, StatisticsRepositoryError>;
}
