//! Statistics HTTP handlers.
//!
//! ```text
//! GET  /statistics
//! GET  /statistics/event-type/{eventType}
//! GET  /statistics/user/{userId}
//! GET  /statistics/counts
//! POST /statistics
//! ```
//!
//! `POST /statistics` is the sink the account and user services publish to.
//! The service itself only checks request shape; every well-formed event is
//! stored.

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{Error, EventCounts, NewStatisticsEvent};
use crate::inbound::http::ApiResult;
use crate::inbound::http::paging::PageQuery;
use crate::inbound::http::schemas::{
    ErrorSchema, NewStatisticsEventSchema, StatisticsEventSchema, StatisticsPageSchema,
};
use crate::inbound::http::state::StatisticsHttpState;
use crate::inbound::http::validation::{FieldName, invalid_value_error, required_text};

/// Raw `POST /statistics` body; every field is checked explicitly so
/// clients get a field-level error instead of a generic decode failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordEventRequest {
    pub event_type: Option<String>,
    pub entity_id: Option<String>,
    pub entity_slug: Option<String>,
    pub user_id: Option<String>,
    pub metadata: Option<Value>,
}

impl RecordEventRequest {
    fn into_event(self) -> Result<NewStatisticsEvent, Error> {
        let event = NewStatisticsEvent::new(
            required_text(self.event_type, FieldName::new("eventType"))?,
            required_text(self.entity_id, FieldName::new("entityId"))?,
            required_text(self.entity_slug, FieldName::new("entitySlug"))?,
            required_text(self.user_id, FieldName::new("userId"))?,
        );
        match self.metadata {
            None | Some(Value::Null) => Ok(event),
            Some(metadata @ Value::Object(_)) => Ok(event.with_metadata(metadata)),
            Some(other) => Err(invalid_value_error(
                FieldName::new("metadata"),
                &other.to_string(),
                "metadata must be a JSON object",
            )),
        }
    }
}

/// List every recorded event.
#[utoipa::path(
    get,
    path = "/statistics",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of events", body = StatisticsPageSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["statistics"],
    operation_id = "listStatistics"
)]
#[get("/statistics")]
pub async fn list_statistics(
    state: web::Data<StatisticsHttpState>,
    paging: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let request = paging.into_inner().into_page_request()?;
    let page = state.statistics_query.list_all(request).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// List events of one type.
#[utoipa::path(
    get,
    path = "/statistics/event-type/{eventType}",
    params(("eventType" = String, Path, description = "Event type tag"), PageQuery),
    responses(
        (status = 200, description = "Page of events", body = StatisticsPageSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["statistics"],
    operation_id = "listStatisticsByEventType"
)]
#[get("/statistics/event-type/{eventType}")]
pub async fn list_by_event_type(
    state: web::Data<StatisticsHttpState>,
    event_type: web::Path<String>,
    paging: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let request = paging.into_inner().into_page_request()?;
    let page = state
        .statistics_query
        .list_by_event_type(&event_type, request)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// List events attributed to one user.
#[utoipa::path(
    get,
    path = "/statistics/user/{userId}",
    params(("userId" = String, Path, description = "User identifier"), PageQuery),
    responses(
        (status = 200, description = "Page of events", body = StatisticsPageSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["statistics"],
    operation_id = "listStatisticsByUser"
)]
#[get("/statistics/user/{userId}")]
pub async fn list_by_user(
    state: web::Data<StatisticsHttpState>,
    user_id: web::Path<String>,
    paging: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let request = paging.into_inner().into_page_request()?;
    let page = state
        .statistics_query
        .list_by_user_id(&user_id, request)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Event counts grouped by type.
#[utoipa::path(
    get,
    path = "/statistics/counts",
    responses(
        (status = 200, description = "Counts keyed by event type", body = std::collections::BTreeMap<String, u64>),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["statistics"],
    operation_id = "countStatistics"
)]
#[get("/statistics/counts")]
pub async fn event_counts(
    state: web::Data<StatisticsHttpState>,
) -> ApiResult<web::Json<EventCounts>> {
    let counts = state.statistics_query.event_counts().await?;
    Ok(web::Json(counts))
}

/// Record one event.
#[utoipa::path(
    post,
    path = "/statistics",
    request_body = NewStatisticsEventSchema,
    responses(
        (status = 201, description = "Event recorded", body = StatisticsEventSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["statistics"],
    operation_id = "recordStatistic"
)]
#[post("/statistics")]
pub async fn record_event(
    state: web::Data<StatisticsHttpState>,
    payload: web::Json<RecordEventRequest>,
) -> ApiResult<HttpResponse> {
    let event = payload.into_inner().into_event()?;
    let stored = state.statistics.record_event(event).await?;
    Ok(HttpResponse::Created().json(stored))
}

/// Register the statistics routes on `cfg`.
///
/// `/statistics/counts` is registered before the parameterised routes so it
/// is never captured as a path argument.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(event_counts)
        .service(list_statistics)
        .service(list_by_event_type)
        .service(list_by_user)
        .service(record_event);
}

#[cfg(test)]
#[path = "statistics_tests.rs"]
mod tests;
