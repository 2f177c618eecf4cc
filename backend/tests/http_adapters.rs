//! The reqwest adapters against in-process services.

use std::sync::Arc;
use std::time::Duration;

use account_platform::domain::ports::{
    StatisticsSink, StatisticsSinkError, UserDirectory, UserDirectoryError,
};
use account_platform::domain::{NewStatisticsEvent, USER_CREATED, UserId};
use account_platform::outbound::http::{HttpStatisticsSink, HttpUserDirectory};
use account_platform::outbound::persistence::{
    InMemoryStatisticsRepository, InMemoryUserRepository,
};
use account_platform::server::{statistics_state, user_state};
use serde_json::{Value, json};

mod support;

use support::{inline_emitter, spawn_service, system_clock, unreachable_url};

const TIMEOUT: Duration = Duration::from_secs(5);

#[actix_web::test]
async fn user_directory_resolves_known_and_unknown_users() {
    let users = spawn_service(user_state(
        Arc::new(InMemoryUserRepository::new()),
        inline_emitter(unreachable_url()),
        system_clock(),
    ));
    let created: Value = reqwest::Client::new()
        .post(users.url("users"))
        .json(&json!({ "email": "ada@example.com", "firstName": "Ada", "lastName": "Lovelace" }))
        .send()
        .await
        .expect("user service answers")
        .json()
        .await
        .expect("user payload");
    let id = created["id"].as_str().expect("user id");
    let directory = HttpUserDirectory::new(users.base_url.clone(), TIMEOUT).expect("client");

    let known = directory
        .find_user(&UserId::new(id).expect("valid id"))
        .await
        .expect("lookup succeeds")
        .expect("user exists");
    let unknown = directory
        .find_user(&UserId::new("665f1c2b9d3e4a0012345678").expect("valid id"))
        .await
        .expect("lookup succeeds");

    assert_eq!(known.id, id);
    assert_eq!(known.email, "ada@example.com");
    assert!(known.is_active);
    assert!(unknown.is_none());
    users.stop().await;
}

#[actix_web::test]
async fn user_directory_reports_transport_failures() {
    let directory = HttpUserDirectory::new(unreachable_url(), TIMEOUT).expect("client");

    let err = directory
        .find_user(&UserId::new("u-1").expect("valid id"))
        .await
        .expect_err("nothing is listening");

    assert!(matches!(
        err,
        UserDirectoryError::Transport { .. } | UserDirectoryError::Timeout { .. }
    ));
}

#[actix_web::test]
async fn statistics_sink_records_events() {
    let statistics = spawn_service(statistics_state(
        Arc::new(InMemoryStatisticsRepository::new()),
        system_clock(),
    ));
    let sink = HttpStatisticsSink::new(statistics.base_url.clone(), TIMEOUT).expect("client");
    let event = NewStatisticsEvent::new(USER_CREATED, "u-1", "ada@example.com", "u-1")
        .with_metadata(json!({ "source": "test" }));

    sink.publish(&event).await.expect("event accepted");

    let page: Value = reqwest::get(statistics.url("statistics/user/u-1"))
        .await
        .expect("statistics service answers")
        .json()
        .await
        .expect("page payload");
    assert_eq!(page["totalItems"], 1);
    assert_eq!(page["items"][0]["eventType"], USER_CREATED);
    assert_eq!(page["items"][0]["metadata"]["source"], "test");
    statistics.stop().await;
}

#[actix_web::test]
async fn statistics_sink_surfaces_rejections() {
    let users = spawn_service(user_state(
        Arc::new(InMemoryUserRepository::new()),
        inline_emitter(unreachable_url()),
        system_clock(),
    ));
    // The user service has no statistics route.
    let sink = HttpStatisticsSink::new(users.base_url.clone(), TIMEOUT).expect("client");

    let err = sink
        .publish(&NewStatisticsEvent::new(USER_CREATED, "u-1", "a@b.c", "u-1"))
        .await
        .expect_err("404 is a rejection");

    assert!(matches!(err, StatisticsSinkError::Rejected { status: 404, .. }));
    users.stop().await;
}
