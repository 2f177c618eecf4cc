//! Best-effort publication of statistics events.
//!
//! [`StatisticsEmitter::emit`] cannot fail from the caller's point of view:
//! sink errors are logged at `warn` and dropped. A detached emitter hands the
//! publish to a new Tokio task so the primary write returns without waiting
//! on the statistics service.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::TraceId;
use crate::domain::ports::StatisticsSink;
use crate::domain::NewStatisticsEvent;

/// Wraps a [`StatisticsSink`] so that publishing never propagates errors.
#[derive(Clone)]
pub struct StatisticsEmitter {
    sink: Arc<dyn StatisticsSink>,
    detached: bool,
}

impl StatisticsEmitter {
    /// Emitter that awaits the publish inline.
    pub fn new(sink: Arc<dyn StatisticsSink>) -> Self {
        Self {
            sink,
            detached: false,
        }
    }

    /// Switch to fire-and-forget publishing on a spawned task. The active
    /// trace identifier follows the event into the task.
    #[must_use]
    pub fn detached(mut self) -> Self {
        self.detached = true;
        self
    }

    /// True when publishes run on their own task.
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Publish `event`, logging and discarding any failure.
    pub async fn emit(&self, event: NewStatisticsEvent) {
        if self.detached {
            let sink = Arc::clone(&self.sink);
            drop(TraceId::spawn_scoped(async move {
                publish(sink.as_ref(), &event).await;
            }));
        } else {
            publish(self.sink.as_ref(), &event).await;
        }
    }
}

async fn publish(sink: &dyn StatisticsSink, event: &NewStatisticsEvent) {
    match sink.publish(event).await {
        Ok(()) => debug!(
            event_type = %event.event_type,
            entity_id = %event.entity_id,
            "statistics event published"
        ),
        Err(err) => warn!(
            event_type = %event.event_type,
            entity_id = %event.entity_id,
            error = %err,
            "statistics event dropped"
        ),
    }
}
