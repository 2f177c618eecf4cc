//! Tests for the user service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockStatisticsSink, MockUserRepository, StatisticsSinkError};
use crate::test_support::{fixture_clock, fixture_timestamp, stored_user};

fn make_service(repo: MockUserRepository, sink: MockStatisticsSink) -> UserService<MockUserRepository> {
    UserService::new(
        Arc::new(repo),
        StatisticsEmitter::new(Arc::new(sink)),
        fixture_clock(),
    )
}

fn accepting_sink() -> MockStatisticsSink {
    let mut sink = MockStatisticsSink::new();
    sink.expect_publish().returning(|_| Ok(()));
    sink
}

fn registration() -> CreateUserInput {
    CreateUserInput {
        email: Some("ada@example.com".to_owned()),
        first_name: Some("Ada".to_owned()),
        last_name: Some("Lovelace".to_owned()),
        phone_number: None,
        is_active: None,
    }
}

fn echoing_save(repo: &mut MockUserRepository) {
    repo.expect_save().returning(|draft| {
        let id = draft
            .id
            .clone()
            .unwrap_or_else(|| UserId::new("u-new").expect("id"));
        Ok(draft.into_user(id))
    });
}

#[rstest]
#[tokio::test]
async fn create_defaults_to_active() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email().returning(|_| Ok(None));
    echoing_save(&mut repo);
    let mut sink = MockStatisticsSink::new();
    sink.expect_publish()
        .withf(|event| {
            event.event_type == USER_CREATED
                && event.entity_id == "u-new"
                && event.entity_slug == "ada@example.com"
        })
        .times(1)
        .return_once(|_| Ok(()));
    let service = make_service(repo, sink);

    let user = service.create(registration()).await.expect("create succeeds");
    assert!(user.is_active);
    assert_eq!(user.id.as_ref(), "u-new");
    assert_eq!(user.created_at, fixture_timestamp());
}

#[rstest]
#[tokio::test]
async fn create_respects_explicit_inactive_flag() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email().returning(|_| Ok(None));
    echoing_save(&mut repo);
    let service = make_service(repo, accepting_sink());

    let input = CreateUserInput {
        is_active: Some(false),
        ..registration()
    };
    let user = service.create(input).await.expect("create succeeds");
    assert!(!user.is_active);
}

#[rstest]
#[tokio::test]
async fn create_with_registered_email_conflicts() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .returning(|email| Ok(Some(stored_user("u-1", email))));
    repo.expect_save().times(0);
    let service = make_service(repo, MockStatisticsSink::new());

    let err = service.create(registration()).await.expect_err("duplicate");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[case::no_email(CreateUserInput { email: None, ..registration() })]
#[case::bad_email(CreateUserInput { email: Some("not-an-email".to_owned()), ..registration() })]
#[case::no_first_name(CreateUserInput { first_name: None, ..registration() })]
#[case::long_last_name(CreateUserInput { last_name: Some("x".repeat(51)), ..registration() })]
#[tokio::test]
async fn create_validates_required_fields(#[case] input: CreateUserInput) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email().times(0);
    repo.expect_save().times(0);
    let service = make_service(repo, MockStatisticsSink::new());

    let err = service.create(input).await.expect_err("invalid");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn update_requires_an_id() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().times(0);
    let service = make_service(repo, MockStatisticsSink::new());

    let patch = UserPatch {
        first_name: Some("Grace".to_owned()),
        ..UserPatch::default()
    };
    let err = service.update(patch).await.expect_err("missing id");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn update_of_unknown_user_is_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().return_once(|_| Ok(None));
    let service = make_service(repo, MockStatisticsSink::new());

    let err = service
        .update(UserPatch::activation("u-404", true))
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn update_to_another_users_email_conflicts() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .return_once(|_| Ok(Some(stored_user("u-1", "ada@example.com"))));
    repo.expect_find_by_email()
        .returning(|email| Ok(Some(stored_user("u-2", email))));
    repo.expect_save().times(0);
    let service = make_service(repo, MockStatisticsSink::new());

    let patch = UserPatch {
        id: Some("u-1".to_owned()),
        email: Some("grace@example.com".to_owned()),
        ..UserPatch::default()
    };
    let err = service.update(patch).await.expect_err("taken");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn update_keeping_own_email_skips_the_uniqueness_lookup() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .return_once(|_| Ok(Some(stored_user("u-1", "ada@example.com"))));
    repo.expect_find_by_email().times(0);
    echoing_save(&mut repo);
    let service = make_service(repo, accepting_sink());

    let patch = UserPatch {
        id: Some("u-1".to_owned()),
        email: Some("ada@example.com".to_owned()),
        last_name: Some("King".to_owned()),
        ..UserPatch::default()
    };
    let user = service.update(patch).await.expect("update succeeds");
    assert_eq!(user.last_name, "King");
    assert_eq!(user.first_name, "Ada");
}

#[rstest]
#[tokio::test]
async fn activate_is_idempotent_apart_from_timestamps() {
    let existing = stored_user("u-1", "ada@example.com");
    let before = existing.clone();
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    echoing_save(&mut repo);
    let service = make_service(repo, accepting_sink());

    let user = service.activate("u-1").await.expect("activate succeeds");
    assert_eq!(
        User {
            updated_at: before.updated_at,
            ..user.clone()
        },
        before
    );
    assert_eq!(user.updated_at, fixture_timestamp());
}

#[rstest]
#[tokio::test]
async fn deactivate_clears_the_flag_and_survives_statistics_outage() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .return_once(|_| Ok(Some(stored_user("u-1", "ada@example.com"))));
    echoing_save(&mut repo);
    let mut sink = MockStatisticsSink::new();
    sink.expect_publish()
        .withf(|event| {
            event.event_type == USER_UPDATED
                && event
                    .metadata
                    .as_ref()
                    .is_some_and(|metadata| metadata["updatedFields"] == serde_json::json!(["id", "isActive"]))
        })
        .times(1)
        .return_once(|_| Err(StatisticsSinkError::timeout("slow")));
    let service = make_service(repo, sink);

    let user = service.deactivate("u-1").await.expect("deactivate succeeds");
    assert!(!user.is_active);
}

#[rstest]
#[tokio::test]
async fn delete_of_unknown_user_is_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().return_once(|_| Ok(None));
    repo.expect_delete().times(0);
    let service = make_service(repo, MockStatisticsSink::new());

    let err = service.delete("u-404").await.expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn delete_publishes_the_removed_user() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .return_once(|_| Ok(Some(stored_user("u-1", "ada@example.com"))));
    repo.expect_delete().times(1).return_once(|_| Ok(true));
    let mut sink = MockStatisticsSink::new();
    sink.expect_publish()
        .withf(|event| event.event_type == USER_DELETED && event.entity_id == "u-1")
        .times(1)
        .return_once(|_| Ok(()));
    let service = make_service(repo, sink);

    let user = service.delete("u-1").await.expect("delete succeeds");
    assert_eq!(user.email, "ada@example.com");
}

#[rstest]
#[tokio::test]
async fn list_checks_sort_fields() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_page().times(0);
    let service = make_service(repo, MockStatisticsSink::new());

    let request =
        PageRequest::new(1, 10, "score", pagination::SortOrder::Desc).expect("page request");
    let err = service
        .list(UserFilter::default(), request)
        .await
        .expect_err("users cannot sort by score");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}
