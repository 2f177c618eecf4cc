//! Append-only statistics events.
//!
//! Account and user services publish one event per successful write; the
//! statistics service stores them and answers aggregate queries.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Event tag published after an account is created.
pub const ACCOUNT_CREATED: &str = "account_created";
/// Event tag published after an account is updated.
pub const ACCOUNT_UPDATED: &str = "account_updated";
/// Event tag published after an account is deleted.
pub const ACCOUNT_DELETED: &str = "account_deleted";
/// Event tag published after a user registers.
pub const USER_CREATED: &str = "user_created";
/// Event tag published after a user is updated.
pub const USER_UPDATED: &str = "user_updated";
/// Event tag published after a user is deleted.
pub const USER_DELETED: &str = "user_deleted";

/// Wire names of the fields a statistics listing may be sorted by.
pub const STATISTICS_SORT_FIELDS: &[&str] = &["createdAt", "eventType", "userId", "entitySlug"];

/// Stored statistics record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsEvent {
    pub id: String,
    pub event_type: String,
    pub entity_id: String,
    pub entity_slug: String,
    pub user_id: String,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
}

/// Event payload as published by producers and accepted by
/// `POST /statistics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStatisticsEvent {
    pub event_type: String,
    pub entity_id: String,
    pub entity_slug: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl NewStatisticsEvent {
    /// Build an event without metadata.
    pub fn new(
        event_type: impl Into<String>,
        entity_id: impl Into<String>,
        entity_slug: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            entity_id: entity_id.into(),
            entity_slug: entity_slug.into(),
            user_id: user_id.into(),
            metadata: None,
        }
    }

    /// Attach an opaque metadata payload.
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Materialise the stored record, defaulting metadata to `{}`.
    pub fn into_event(self, id: String, created_at: DateTime<Utc>) -> StatisticsEvent {
        StatisticsEvent {
            id,
            event_type: self.event_type,
            entity_id: self.entity_id,
            entity_slug: self.entity_slug,
            user_id: self.user_id,
            metadata: self.metadata.unwrap_or_else(|| Value::Object(Map::new())),
            created_at,
        }
    }
}

/// Event counts keyed by event type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventCounts(pub BTreeMap<String, u64>);

impl EventCounts {
    /// Count for `event_type`, zero when absent.
    pub fn get(&self, event_type: &str) -> u64 {
        self.0.get(event_type).copied().unwrap_or(0)
    }

    /// True when no events were counted.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, u64>> for EventCounts {
    fn from(value: BTreeMap<String, u64>) -> Self {
        Self(value)
    }
}

/// Listing filter for statistics; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatisticsFilter {
    pub event_type: Option<String>,
    pub user_id: Option<String>,
}

impl StatisticsFilter {
    /// True when `event` satisfies every set criterion.
    pub fn matches(&self, event: &StatisticsEvent) -> bool {
        self.event_type
            .as_deref()
            .is_none_or(|wanted| wanted == event.event_type)
            && self
                .user_id
                .as_deref()
                .is_none_or(|wanted| wanted == event.user_id)
    }
}
