//! MongoDB-backed `StatisticsRepository` implementation.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Document, doc};
use pagination::{Page, PageRequest};
use serde_json::{Map, Value};

use super::documents::{
    DocumentError, StatisticsDocument, event_count_row, page_limit, sort_document,
    statistics_filter_document, to_bson_datetime,
};
use super::mongo_error_mapping::map_mongo_error;
use super::mongo_store::{MongoStore, STATISTICS_COLLECTION};
use crate::domain::ports::{StatisticsRepository, StatisticsRepositoryError};
use crate::domain::{NewStatisticsEvent, StatisticsEvent, StatisticsFilter};

/// Event store over the `statistics` collection.
#[derive(Clone)]
pub struct MongoStatisticsRepository {
    collection: Collection<StatisticsDocument>,
}

impl MongoStatisticsRepository {
    /// Create a repository bound to the store's `statistics` collection.
    pub fn new(store: &MongoStore) -> Self {
        Self {
            collection: store.collection(STATISTICS_COLLECTION),
        }
    }
}

fn map_error(error: mongodb::error::Error) -> StatisticsRepositoryError {
    map_mongo_error(
        error,
        StatisticsRepositoryError::query,
        StatisticsRepositoryError::connection,
        StatisticsRepositoryError::duplicate,
    )
}

fn map_document_error(error: DocumentError) -> StatisticsRepositoryError {
    StatisticsRepositoryError::query(error.to_string())
}

#[async_trait]
impl StatisticsRepository for MongoStatisticsRepository {
    async fn find_page(
        &self,
        filter: &StatisticsFilter,
        request: &PageRequest,
    ) -> Result<Page<StatisticsEvent>, StatisticsRepositoryError> {
        let query = statistics_filter_document(filter);
        let total = self
            .collection
            .count_documents(query.clone())
            .await
            .map_err(map_error)?;
        let documents: Vec<StatisticsDocument> = self
            .collection
            .find(query)
            .sort(sort_document(request))
            .skip(request.offset())
            .limit(page_limit(request))
            .await
            .map_err(map_error)?
            .try_collect()
            .await
            .map_err(map_error)?;
        let items = documents
            .into_iter()
            .map(StatisticsDocument::into_domain)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_document_error)?;
        Ok(Page::new(items, request, total))
    }

    async fn insert(
        &self,
        event: NewStatisticsEvent,
        created_at: DateTime<Utc>,
    ) -> Result<StatisticsEvent, StatisticsRepositoryError> {
        let document = StatisticsDocument {
            id: ObjectId::new(),
            event_type: event.event_type,
            entity_id: event.entity_id,
            entity_slug: event.entity_slug,
            user_id: event.user_id,
            metadata: event.metadata.unwrap_or_else(|| Value::Object(Map::new())),
            created_at: to_bson_datetime(created_at),
        };
        self.collection
            .insert_one(&document)
            .await
            .map_err(map_error)?;
        document.into_domain().map_err(map_document_error)
    }

    async fn count_by_event_type(
        &self,
    ) -> Result<BTreeMap<String, u64>, StatisticsRepositoryError> {
        let pipeline = [doc! {
            "$group": { "_id": "$eventType", "count": { "$sum": 1 } }
        }];
        let rows: Vec<Document> = self
            .collection
            .aggregate(pipeline)
            .await
            .map_err(map_error)?
            .try_collect()
            .await
            .map_err(map_error)?;
        Ok(rows.iter().filter_map(event_count_row).collect())
    }
}
