//! Tests for the account service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::rstest;
use serde_json::json;

use super::*;
use crate::domain::ports::{
    MockAccountRepository, MockStatisticsSink, MockUserDirectory, StatisticsSinkError,
    UserSummary,
};
use crate::domain::{AccountId, ErrorCode};
use crate::outbound::persistence::InMemoryAccountRepository;
use crate::test_support::{fixture_clock, fixture_timestamp, stored_account};

type Service = AccountService<MockAccountRepository, MockUserDirectory>;

fn make_service(
    repo: MockAccountRepository,
    users: MockUserDirectory,
    sink: MockStatisticsSink,
) -> Service {
    AccountService::new(
        Arc::new(repo),
        Arc::new(users),
        StatisticsEmitter::new(Arc::new(sink)),
        fixture_clock(),
    )
}

fn create_input() -> CreateAccountInput {
    CreateAccountInput {
        user_id: Some("u-1".to_owned()),
        slug: Some("acme".to_owned()),
        name: Some("Acme".to_owned()),
        description: Some("Widgets".to_owned()),
        score: Some(7.5),
    }
}

fn known_user() -> MockUserDirectory {
    let mut users = MockUserDirectory::new();
    users.expect_find_user().returning(|id| {
        Ok(Some(UserSummary {
            id: id.to_string(),
            email: "ada@example.com".to_owned(),
            is_active: true,
        }))
    });
    users
}

fn saving_repo() -> MockAccountRepository {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_slug().returning(|_| Ok(None));
    repo.expect_save()
        .times(1)
        .returning(|draft| Ok(draft.into_account(AccountId::new("acc-1").expect("id"))));
    repo
}

fn in_memory_service() -> AccountService<InMemoryAccountRepository, MockUserDirectory> {
    AccountService::new(
        Arc::new(InMemoryAccountRepository::new()),
        Arc::new(known_user()),
        StatisticsEmitter::new(Arc::new(accepting_sink())),
        fixture_clock(),
    )
}

fn accepting_sink() -> MockStatisticsSink {
    let mut sink = MockStatisticsSink::new();
    sink.expect_publish().returning(|_| Ok(()));
    sink
}

#[rstest]
#[tokio::test]
async fn create_persists_and_returns_the_account() {
    let mut sink = MockStatisticsSink::new();
    sink.expect_publish()
        .withf(|event| {
            event.event_type == ACCOUNT_CREATED
                && event.entity_id == "acc-1"
                && event.entity_slug == "acme"
                && event.user_id == "u-1"
                && event.metadata
                    == Some(json!({ "name": "Acme", "description": "Widgets", "score": 7.5 }))
        })
        .times(1)
        .return_once(|_| Ok(()));
    let service = make_service(saving_repo(), known_user(), sink);

    let account = service.create(create_input()).await.expect("create succeeds");

    assert_eq!(account.id.as_ref(), "acc-1");
    assert_eq!(account.slug.as_ref(), "acme");
    assert_eq!(account.user_id.as_ref(), "u-1");
    assert_eq!(account.name, "Acme");
    assert_eq!(account.description.as_deref(), Some("Widgets"));
    assert_eq!(account.score, Some(7.5));
    assert_eq!(account.created_at, fixture_timestamp());
    assert_eq!(account.updated_at, fixture_timestamp());
}

#[rstest]
#[tokio::test]
async fn create_requires_user_id_before_touching_collaborators() {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_slug().times(0);
    repo.expect_save().times(0);
    let mut users = MockUserDirectory::new();
    users.expect_find_user().times(0);
    let service = make_service(repo, users, MockStatisticsSink::new());

    let input = CreateAccountInput {
        user_id: None,
        ..create_input()
    };
    let err = service.create(input).await.expect_err("missing userId");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.details(), Some(&json!({ "field": "userId", "code": "missing_field" })));
}

#[rstest]
#[case::complete(create_input())]
#[case::without_name(CreateAccountInput { name: None, ..create_input() })]
#[case::with_bad_score(CreateAccountInput { score: Some(-3.0), ..create_input() })]
#[tokio::test]
async fn create_with_taken_slug_conflicts(#[case] input: CreateAccountInput) {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_slug()
        .returning(|slug| Ok(Some(stored_account(slug.as_ref()))));
    repo.expect_save().times(0);
    let mut users = MockUserDirectory::new();
    users.expect_find_user().times(0);
    let service = make_service(repo, users, MockStatisticsSink::new());

    let err = service.create(input).await.expect_err("slug taken");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn create_with_unknown_user_is_rejected_without_persisting() {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_slug().returning(|_| Ok(None));
    repo.expect_save().times(0);
    let mut users = MockUserDirectory::new();
    users
        .expect_find_user()
        .with(eq(UserId::new("u-1").expect("id")))
        .times(1)
        .return_once(|_| Ok(None));
    let mut sink = MockStatisticsSink::new();
    sink.expect_publish().times(0);
    let service = make_service(repo, users, sink);

    let err = service.create(create_input()).await.expect_err("unknown user");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn create_surfaces_user_service_outage() {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_slug().returning(|_| Ok(None));
    repo.expect_save().times(0);
    let mut users = MockUserDirectory::new();
    users
        .expect_find_user()
        .return_once(|_| Err(UserDirectoryError::transport("connection refused")));
    let service = make_service(repo, users, MockStatisticsSink::new());

    let err = service.create(create_input()).await.expect_err("outage");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn create_ignores_statistics_failures() {
    let mut sink = MockStatisticsSink::new();
    sink.expect_publish()
        .times(1)
        .return_once(|_| Err(StatisticsSinkError::rejected(500_u16, "boom")));
    let service = make_service(saving_repo(), known_user(), sink);

    let account = service.create(create_input()).await.expect("create still succeeds");
    assert_eq!(account.slug.as_ref(), "acme");
}

#[rstest]
#[case::blank_slug(CreateAccountInput { slug: Some("   ".to_owned()), ..create_input() })]
#[case::missing_slug(CreateAccountInput { slug: None, ..create_input() })]
#[tokio::test]
async fn create_rejects_malformed_slugs(#[case] input: CreateAccountInput) {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_slug().times(0);
    let service = make_service(repo, MockUserDirectory::new(), MockStatisticsSink::new());

    let err = service.create(input).await.expect_err("invalid slug");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn create_maps_duplicate_index_violation_to_conflict() {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_slug().returning(|_| Ok(None));
    repo.expect_save()
        .return_once(|_| Err(AccountRepositoryError::duplicate("E11000 slug")));
    let mut sink = MockStatisticsSink::new();
    sink.expect_publish().times(0);
    let service = make_service(repo, known_user(), sink);

    let err = service.create(create_input()).await.expect_err("lost race");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[case::id(AccountPatch { id: Some("acc-1".to_owned()), slug: Some("acme".to_owned()), ..AccountPatch::default() })]
#[case::user_id(AccountPatch { user_id: Some("u-2".to_owned()), slug: Some("acme".to_owned()), ..AccountPatch::default() })]
#[case::no_slug(AccountPatch { name: Some("New".to_owned()), ..AccountPatch::default() })]
#[tokio::test]
async fn update_rejects_invalid_patches_before_store_access(#[case] patch: AccountPatch) {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_slug().times(0);
    repo.expect_save().times(0);
    let service = make_service(repo, MockUserDirectory::new(), MockStatisticsSink::new());

    let err = service.update(patch).await.expect_err("invalid patch");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn update_of_missing_account_is_not_found() {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_slug().return_once(|_| Ok(None));
    repo.expect_save().times(0);
    let service = make_service(repo, MockUserDirectory::new(), MockStatisticsSink::new());

    let patch = AccountPatch {
        slug: Some("ghost".to_owned()),
        name: Some("Ghost".to_owned()),
        ..AccountPatch::default()
    };
    let err = service.update(patch).await.expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn update_merges_and_reports_changes() {
    let previous = stored_account("acme");
    let expected_previous = serde_json::to_value(&previous).expect("json");
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_slug()
        .return_once(move |_| Ok(Some(previous)));
    repo.expect_save().times(1).returning(|draft| {
        let id = draft.id.clone().expect("existing id kept");
        Ok(draft.into_account(id))
    });
    let mut sink = MockStatisticsSink::new();
    sink.expect_publish()
        .withf(move |event| {
            let Some(metadata) = event.metadata.as_ref() else {
                return false;
            };
            event.event_type == ACCOUNT_UPDATED
                && metadata["updatedFields"] == json!(["slug", "name"])
                && metadata["previousValues"] == expected_previous
                && metadata["newValues"]["name"] == "Renamed"
        })
        .times(1)
        .return_once(|_| Ok(()));
    let service = make_service(repo, MockUserDirectory::new(), sink);

    let patch = AccountPatch {
        slug: Some("acme".to_owned()),
        name: Some("Renamed".to_owned()),
        ..AccountPatch::default()
    };
    let account = service.update(patch).await.expect("update succeeds");

    assert_eq!(account.name, "Renamed");
    assert_eq!(account.description.as_deref(), Some("Fixture account"));
    assert_eq!(account.score, Some(3.5));
    assert_eq!(account.updated_at, fixture_timestamp());
    assert!(account.created_at < account.updated_at);
}

#[rstest]
#[tokio::test]
async fn delete_of_missing_account_is_not_found() {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_slug().return_once(|_| Ok(None));
    repo.expect_delete().times(0);
    let service = make_service(repo, MockUserDirectory::new(), MockStatisticsSink::new());

    let err = service.delete("ghost").await.expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn delete_removes_by_id_and_reports_the_record() {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_slug()
        .return_once(|_| Ok(Some(stored_account("acme"))));
    repo.expect_delete()
        .with(eq(AccountId::new("acc-acme").expect("id")))
        .times(1)
        .return_once(|_| Ok(true));
    let mut sink = MockStatisticsSink::new();
    sink.expect_publish()
        .withf(|event| {
            event.event_type == ACCOUNT_DELETED
                && event
                    .metadata
                    .as_ref()
                    .is_some_and(|metadata| metadata["deletedAccount"]["slug"] == "acme")
        })
        .times(1)
        .return_once(|_| Ok(()));
    let service = make_service(repo, MockUserDirectory::new(), sink);

    let removed = service.delete("acme").await.expect("delete succeeds");
    assert_eq!(removed.slug.as_ref(), "acme");
}

#[rstest]
#[tokio::test]
async fn list_rejects_unknown_sort_fields() {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_page().times(0);
    let service = make_service(repo, MockUserDirectory::new(), accepting_sink());

    let request =
        PageRequest::new(1, 10, "password", pagination::SortOrder::Asc).expect("page request");
    let err = service
        .list(AccountFilter::default(), request)
        .await
        .expect_err("unsupported sort");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn repository_outage_maps_to_service_unavailable() {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_slug()
        .return_once(|_| Err(AccountRepositoryError::connection("no primary")));
    let service = make_service(repo, MockUserDirectory::new(), MockStatisticsSink::new());

    let err = service.get_by_slug("acme").await.expect_err("outage");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn created_account_reads_back_unchanged_by_slug() {
    let service = in_memory_service();

    let created = service.create(create_input()).await.expect("create succeeds");
    let fetched = service.get_by_slug("acme").await.expect("stored account");

    assert!(!created.id.as_ref().is_empty());
    assert_eq!(fetched, created);
}

#[rstest]
#[case("Acme")]
#[case("acme_corp")]
#[case("Acme Corp")]
#[tokio::test]
async fn free_form_slugs_are_accepted_and_addressable(#[case] slug: &str) {
    let service = in_memory_service();
    let input = CreateAccountInput {
        slug: Some(slug.to_owned()),
        ..create_input()
    };

    let created = service.create(input).await.expect("create succeeds");
    assert_eq!(created.slug.as_ref(), slug);
    let fetched = service.get_by_slug(slug).await.expect("stored account");
    assert_eq!(fetched, created);
    service.delete(slug).await.expect("delete succeeds");
}

#[rstest]
#[tokio::test]
async fn null_description_in_update_clears_it() {
    let service = in_memory_service();
    service.create(create_input()).await.expect("create succeeds");

    let patch: AccountPatch =
        serde_json::from_value(json!({ "slug": "acme", "description": null })).expect("patch");
    let updated = service.update(patch).await.expect("update succeeds");

    assert_eq!(updated.description, None);
    let fetched = service.get_by_slug("acme").await.expect("stored account");
    assert_eq!(fetched.description, None);
    assert_eq!(fetched.name, "Acme");
}
