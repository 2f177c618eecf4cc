//! Account use-cases: the cross-service write-with-side-effect flow.
//!
//! Creation confirms the owning user through [`UserDirectory`] before
//! persisting. Every successful write is followed by a best-effort
//! statistics event; the event may be lost, the write never rolls back.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use mockable::Clock;
use pagination::{Page, PageRequest};
use serde_json::json;
use tracing::info;

use crate::domain::paging::ensure_sortable;
use crate::domain::ports::{
    AccountCommand, AccountQuery, AccountRepository, AccountRepositoryError, UserDirectory,
    UserDirectoryError,
};
use crate::domain::{
    ACCOUNT_CREATED, ACCOUNT_DELETED, ACCOUNT_SORT_FIELDS, ACCOUNT_UPDATED, Account,
    AccountDraft, AccountFilter, AccountPatch, CreateAccountInput, Error, NewStatisticsEvent,
    Slug, StatisticsEmitter, UserId, validate_account_name, validate_score,
};

/// Account service implementing [`AccountCommand`] and [`AccountQuery`].
#[derive(Clone)]
pub struct AccountService<R, D> {
    accounts: Arc<R>,
    users: Arc<D>,
    emitter: StatisticsEmitter,
    clock: Arc<dyn Clock>,
}

impl<R, D> AccountService<R, D> {
    /// Wire the service to its repository, user lookup, and emitter.
    pub fn new(
        accounts: Arc<R>,
        users: Arc<D>,
        emitter: StatisticsEmitter,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            users,
            emitter,
            clock,
        }
    }
}

impl<R, D> AccountService<R, D>
where
    R: AccountRepository,
    D: UserDirectory,
{
    fn map_repository_error(error: AccountRepositoryError) -> Error {
        match error {
            AccountRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("account repository unavailable: {message}"))
            }
            AccountRepositoryError::Query { message } => {
                Error::internal(format!("account repository error: {message}"))
            }
            AccountRepositoryError::Duplicate { message } => {
                Error::conflict("an account with this slug already exists").with_details(json!({
                    "field": "slug",
                    "code": "duplicate_slug",
                    "reason": message,
                }))
            }
        }
    }

    fn map_directory_error(error: UserDirectoryError) -> Error {
        Error::service_unavailable("user service unavailable").with_details(json!({
            "dependency": "user-service",
            "reason": error.to_string(),
        }))
    }

    fn now(&self) -> DateTime<Utc> {
        // Stores keep millisecond precision.
        self.clock.utc().trunc_subsecs(3)
    }

    async fn existing(&self, raw_slug: &str) -> Result<Account, Error> {
        let not_found = || Error::not_found(format!("account '{raw_slug}' not found"));
        let Ok(slug) = Slug::new(raw_slug) else {
            return Err(not_found());
        };
        self.accounts
            .find_by_slug(&slug)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(not_found)
    }

    async fn ensure_slug_free(&self, slug: &Slug) -> Result<(), Error> {
        let taken = self
            .accounts
            .find_by_slug(slug)
            .await
            .map_err(Self::map_repository_error)?;
        match taken {
            Some(_) => Err(Error::conflict(format!("slug '{slug}' is already taken"))
                .with_details(json!({ "field": "slug", "code": "duplicate_slug" }))),
            None => Ok(()),
        }
    }

    async fn ensure_user_exists(&self, user_id: &UserId) -> Result<(), Error> {
        let found = self
            .users
            .find_user(user_id)
            .await
            .map_err(Self::map_directory_error)?;
        match found {
            Some(_) => Ok(()),
            None => Err(Error::invalid_request(format!("user '{user_id}' does not exist"))
                .with_details(json!({ "field": "userId", "code": "unknown_user" }))),
        }
    }
}

fn missing(field: &str) -> Error {
    Error::invalid_request(format!("{field} is required"))
        .with_details(json!({ "field": field, "code": "missing_field" }))
}

fn forbidden(field: &str) -> Error {
    Error::invalid_request(format!("{field} cannot be updated"))
        .with_details(json!({ "field": field, "code": "immutable_field" }))
}

fn invalid(field: &str, err: impl std::fmt::Display) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": field, "code": "invalid_value" }))
}

fn validate_patch(patch: &AccountPatch) -> Result<(), Error> {
    if patch.slug.is_none() {
        return Err(missing("slug"));
    }
    if patch.id.is_some() {
        return Err(forbidden("id"));
    }
    if patch.user_id.is_some() {
        return Err(forbidden("userId"));
    }
    if let Some(name) = &patch.name {
        validate_account_name(name).map_err(|err| invalid("name", err))?;
    }
    validate_score(patch.score).map_err(|err| invalid("score", err))
}

#[async_trait]
impl<R, D> AccountCommand for AccountService<R, D>
where
    R: AccountRepository,
    D: UserDirectory,
{
    async fn create(&self, input: CreateAccountInput) -> Result<Account, Error> {
        let raw_user_id = input.user_id.ok_or_else(|| missing("userId"))?;
        let user_id = UserId::new(raw_user_id).map_err(|err| invalid("userId", err))?;
        let raw_slug = input.slug.ok_or_else(|| missing("slug"))?;
        let slug = Slug::new(raw_slug).map_err(|err| invalid("slug", err))?;

        self.ensure_slug_free(&slug).await?;

        let name = input.name.ok_or_else(|| missing("name"))?;
        validate_account_name(&name).map_err(|err| invalid("name", err))?;
        validate_score(input.score).map_err(|err| invalid("score", err))?;

        self.ensure_user_exists(&user_id).await?;

        let now = self.now();
        let account = self
            .accounts
            .save(AccountDraft {
                id: None,
                slug,
                user_id,
                name,
                description: input.description,
                score: input.score,
                created_at: now,
                updated_at: now,
            })
            .await
            .map_err(Self::map_repository_error)?;
        info!(account_id = %account.id, slug = %account.slug, "account created");

        let event = NewStatisticsEvent::new(
            ACCOUNT_CREATED,
            account.id.to_string(),
            account.slug.to_string(),
            account.user_id.to_string(),
        )
        .with_metadata(json!({
            "name": account.name,
            "description": account.description,
            "score": account.score,
        }));
        self.emitter.emit(event).await;

        Ok(account)
    }

    async fn update(&self, patch: AccountPatch) -> Result<Account, Error> {
        validate_patch(&patch)?;
        let raw_slug = patch.slug.clone().unwrap_or_default();
        let previous = self.existing(&raw_slug).await?;

        let updated_fields = patch.supplied_fields();
        let draft = patch.merge_into(&previous, self.now());
        let account = self
            .accounts
            .save(draft)
            .await
            .map_err(Self::map_repository_error)?;
        info!(account_id = %account.id, slug = %account.slug, "account updated");

        let event = NewStatisticsEvent::new(
            ACCOUNT_UPDATED,
            account.id.to_string(),
            account.slug.to_string(),
            account.user_id.to_string(),
        )
        .with_metadata(json!({
            "updatedFields": updated_fields,
            "previousValues": previous,
            "newValues": account,
        }));
        self.emitter.emit(event).await;

        Ok(account)
    }

    async fn delete(&self, slug: &str) -> Result<Account, Error> {
        let account = self.existing(slug).await?;
        let removed = self
            .accounts
            .delete(&account.id)
            .await
            .map_err(Self::map_repository_error)?;
        if !removed {
            return Err(Error::not_found(format!("account '{slug}' not found")));
        }
        info!(account_id = %account.id, slug = %account.slug, "account deleted");

        let event = NewStatisticsEvent::new(
            ACCOUNT_DELETED,
            account.id.to_string(),
            account.slug.to_string(),
            account.user_id.to_string(),
        )
        .with_metadata(json!({ "deletedAccount": account }));
        self.emitter.emit(event).await;

        Ok(account)
    }
}

#[async_trait]
impl<R, D> AccountQuery for AccountService<R, D>
where
    R: AccountRepository,
    D: UserDirectory,
{
    async fn list(
        &self,
        filter: AccountFilter,
        request: PageRequest,
    ) -> Result<Page<Account>, Error> {
        ensure_sortable(&request, ACCOUNT_SORT_FIELDS)?;
        self.accounts
            .find_page(&filter, &request)
            .await
            .map_err(Self::map_repository_error)
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Account, Error> {
        self.existing(slug).await
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
