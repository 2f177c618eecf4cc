//! BSON document shapes for the three collections.
//!
//! Documents are internal to the adapter: they carry `ObjectId` keys and
//! BSON dates, the domain sees hex string ids and `chrono` timestamps.
//! Field names match the wire names so sort fields map one to one.

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, Bson, Document, doc};
use pagination::{PageRequest, SortOrder};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    Account, AccountDraft, AccountFilter, AccountId, Slug, StatisticsEvent, StatisticsFilter,
    User, UserDraft, UserFilter, UserId,
};

/// Reason a stored document could not be turned into a domain value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored document is invalid: {0}")]
pub struct DocumentError(String);

pub fn to_bson_datetime(value: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(value.timestamp_millis())
}

pub fn from_bson_datetime(value: bson::DateTime) -> Result<DateTime<Utc>, DocumentError> {
    DateTime::<Utc>::from_timestamp_millis(value.timestamp_millis())
        .ok_or_else(|| DocumentError(format!("timestamp {value} out of range")))
}

/// Parse a hex id; `None` when the value cannot be an `ObjectId`.
pub fn parse_object_id(raw: &str) -> Option<ObjectId> {
    ObjectId::parse_str(raw).ok()
}

/// Sort document for `request`, with `_id` as a stable tiebreaker.
pub fn sort_document(request: &PageRequest) -> Document {
    let direction = match request.sort_order() {
        SortOrder::Asc => 1,
        SortOrder::Desc => -1,
    };
    let mut sort = Document::new();
    sort.insert(request.sort_field(), direction);
    sort.insert("_id", direction);
    sort
}

/// `limit` argument for the driver.
pub fn page_limit(request: &PageRequest) -> i64 {
    i64::from(request.page_size())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub slug: String,
    pub user_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl AccountDocument {
    pub fn from_draft(id: ObjectId, draft: &AccountDraft) -> Self {
        Self {
            id,
            slug: draft.slug.to_string(),
            user_id: draft.user_id.to_string(),
            name: draft.name.clone(),
            description: draft.description.clone(),
            score: draft.score,
            created_at: to_bson_datetime(draft.created_at),
            updated_at: to_bson_datetime(draft.updated_at),
        }
    }

    pub fn into_domain(self) -> Result<Account, DocumentError> {
        Ok(Account {
            id: AccountId::new(self.id.to_hex()).map_err(|err| DocumentError(err.to_string()))?,
            slug: Slug::new(self.slug).map_err(|err| DocumentError(err.to_string()))?,
            user_id: UserId::new(self.user_id).map_err(|err| DocumentError(err.to_string()))?,
            name: self.name,
            description: self.description,
            score: self.score,
            created_at: from_bson_datetime(self.created_at)?,
            updated_at: from_bson_datetime(self.updated_at)?,
        })
    }
}

pub fn account_filter_document(filter: &AccountFilter) -> Document {
    let mut query = Document::new();
    if let Some(user_id) = &filter.user_id {
        query.insert("userId", user_id.to_string());
    }
    query
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub is_active: bool,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl UserDocument {
    pub fn from_draft(id: ObjectId, draft: &UserDraft) -> Self {
        Self {
            id,
            email: draft.email.clone(),
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            phone_number: draft.phone_number.clone(),
            is_active: draft.is_active,
            created_at: to_bson_datetime(draft.created_at),
            updated_at: to_bson_datetime(draft.updated_at),
        }
    }

    pub fn into_domain(self) -> Result<User, DocumentError> {
        Ok(User {
            id: UserId::new(self.id.to_hex()).map_err(|err| DocumentError(err.to_string()))?,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: self.phone_number,
            is_active: self.is_active,
            created_at: from_bson_datetime(self.created_at)?,
            updated_at: from_bson_datetime(self.updated_at)?,
        })
    }
}

pub fn user_filter_document(filter: &UserFilter) -> Document {
    let mut query = Document::new();
    if let Some(is_active) = filter.is_active {
        query.insert("isActive", is_active);
    }
    query
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub event_type: String,
    pub entity_id: String,
    pub entity_slug: String,
    pub user_id: String,
    pub metadata: Value,
    pub created_at: bson::DateTime,
}

impl StatisticsDocument {
    pub fn into_domain(self) -> Result<StatisticsEvent, DocumentError> {
        Ok(StatisticsEvent {
            id: self.id.to_hex(),
            event_type: self.event_type,
            entity_id: self.entity_id,
            entity_slug: self.entity_slug,
            user_id: self.user_id,
            metadata: self.metadata,
            created_at: from_bson_datetime(self.created_at)?,
        })
    }
}

pub fn statistics_filter_document(filter: &StatisticsFilter) -> Document {
    let mut query = doc! {};
    if let Some(event_type) = &filter.event_type {
        query.insert("eventType", event_type.as_str());
    }
    if let Some(user_id) = &filter.user_id {
        query.insert("userId", user_id.as_str());
    }
    query
}

/// Read one `{_id: <eventType>, count: <n>}` row produced by the `$group`
/// stage. Rows whose key is not a string are skipped.
pub fn event_count_row(row: &Document) -> Option<(String, u64)> {
    let Some(Bson::String(event_type)) = row.get("_id") else {
        return None;
    };
    let count = match row.get("count")? {
        Bson::Int32(value) => u64::try_from(*value).ok()?,
        Bson::Int64(value) => u64::try_from(*value).ok()?,
        _ => return None,
    };
    Some((event_type.clone(), count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn sort_document_orders_by_field_then_id() {
        let request = PageRequest::new(1, 10, "slug", SortOrder::Asc).expect("request");
        assert_eq!(sort_document(&request), doc! { "slug": 1, "_id": 1 });
        let request = PageRequest::default();
        assert_eq!(sort_document(&request), doc! { "createdAt": -1, "_id": -1 });
    }

    #[rstest]
    fn datetimes_keep_millisecond_precision() {
        let at = Utc
            .with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
            .single()
            .expect("timestamp")
            + chrono::TimeDelta::milliseconds(123);
        assert_eq!(from_bson_datetime(to_bson_datetime(at)).expect("in range"), at);
    }

    #[rstest]
    fn filters_only_include_set_fields() {
        assert_eq!(statistics_filter_document(&StatisticsFilter::default()), doc! {});
        let filter = StatisticsFilter {
            event_type: Some("account_created".to_owned()),
            user_id: Some("u-1".to_owned()),
        };
        assert_eq!(
            statistics_filter_document(&filter),
            doc! { "eventType": "account_created", "userId": "u-1" }
        );
        let filter = UserFilter {
            is_active: Some(false),
        };
        assert_eq!(user_filter_document(&filter), doc! { "isActive": false });
    }

    #[rstest]
    #[case(doc! { "_id": "a", "count": 2_i32 }, Some(("a".to_owned(), 2)))]
    #[case(doc! { "_id": "b", "count": 7_i64 }, Some(("b".to_owned(), 7)))]
    #[case(doc! { "_id": Bson::Null, "count": 1_i32 }, None)]
    fn count_rows_are_decoded(#[case] row: Document, #[case] expected: Option<(String, u64)>) {
        assert_eq!(event_count_row(&row), expected);
    }

    #[rstest]
    fn account_documents_use_hex_ids() {
        let id = ObjectId::new();
        let now = Utc::now();
        let draft = AccountDraft {
            id: None,
            slug: Slug::new("acme").expect("slug"),
            user_id: UserId::new("u-1").expect("user"),
            name: "Acme".to_owned(),
            description: None,
            score: Some(1.5),
            created_at: now,
            updated_at: now,
        };
        let account = AccountDocument::from_draft(id, &draft)
            .into_domain()
            .expect("valid document");
        assert_eq!(account.id.to_string(), id.to_hex());
        assert_eq!(account.score, Some(1.5));
    }

    #[rstest]
    fn statistics_metadata_round_trips_through_bson() {
        let document = StatisticsDocument {
            id: ObjectId::new(),
            event_type: "account_created".to_owned(),
            entity_id: "a".to_owned(),
            entity_slug: "acme".to_owned(),
            user_id: "u".to_owned(),
            metadata: json!({ "name": "Acme", "score": 2.5, "tags": ["x"] }),
            created_at: to_bson_datetime(Utc::now()),
        };
        let raw = bson::to_document(&document).expect("to bson");
        let back: StatisticsDocument = bson::from_document(raw).expect("from bson");
        assert_eq!(back.metadata, document.metadata);
    }
}
