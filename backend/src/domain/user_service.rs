//! User use-cases: registration, partial updates, and activation toggles.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use mockable::Clock;
use pagination::{Page, PageRequest};
use serde_json::json;
use tracing::info;

use crate::domain::paging::ensure_sortable;
use crate::domain::ports::{UserCommand, UserQuery, UserRepository, UserRepositoryError};
use crate::domain::{
    CreateUserInput, Error, NewStatisticsEvent, StatisticsEmitter, USER_CREATED, USER_DELETED,
    USER_SORT_FIELDS, USER_UPDATED, User, UserDraft, UserFilter, UserId, UserPatch,
    validate_email, validate_name,
};

/// User service implementing [`UserCommand`] and [`UserQuery`].
#[derive(Clone)]
pub struct UserService<R> {
    users: Arc<R>,
    emitter: StatisticsEmitter,
    clock: Arc<dyn Clock>,
}

impl<R> UserService<R> {
    /// Wire the service to its repository and emitter.
    pub fn new(users: Arc<R>, emitter: StatisticsEmitter, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            emitter,
            clock,
        }
    }
}

fn missing(field: &str) -> Error {
    Error::invalid_request(format!("{field} is required"))
        .with_details(json!({ "field": field, "code": "missing_field" }))
}

fn invalid(field: &str, err: impl std::fmt::Display) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": field, "code": "invalid_value" }))
}

fn email_taken(email: &str) -> Error {
    Error::conflict(format!("email '{email}' is already registered"))
        .with_details(json!({ "field": "email", "code": "duplicate_email" }))
}

fn user_event(event_type: &str, user: &User) -> NewStatisticsEvent {
    NewStatisticsEvent::new(
        event_type,
        user.id.to_string(),
        user.email.clone(),
        user.id.to_string(),
    )
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    fn map_repository_error(error: UserRepositoryError) -> Error {
        match error {
            UserRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserRepositoryError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserRepositoryError::Duplicate { message } => {
                Error::conflict("a user with this email already exists").with_details(json!({
                    "field": "email",
                    "code": "duplicate_email",
                    "reason": message,
                }))
            }
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.utc().trunc_subsecs(3)
    }

    async fn existing(&self, raw_id: &str) -> Result<User, Error> {
        let not_found = || Error::not_found(format!("user '{raw_id}' not found"));
        let Ok(id) = UserId::new(raw_id) else {
            return Err(not_found());
        };
        self.users
            .find_by_id(&id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(not_found)
    }

    async fn email_owner(&self, email: &str) -> Result<Option<User>, Error> {
        self.users
            .find_by_email(email)
            .await
            .map_err(Self::map_repository_error)
    }
}

#[async_trait]
impl<R> UserCommand for UserService<R>
where
    R: UserRepository,
{
    async fn create(&self, input: CreateUserInput) -> Result<User, Error> {
        let email = input.email.ok_or_else(|| missing("email"))?;
        validate_email(&email).map_err(|err| invalid("email", err))?;
        let first_name = input.first_name.ok_or_else(|| missing("firstName"))?;
        validate_name("firstName", &first_name).map_err(|err| invalid("firstName", err))?;
        let last_name = input.last_name.ok_or_else(|| missing("lastName"))?;
        validate_name("lastName", &last_name).map_err(|err| invalid("lastName", err))?;

        if self.email_owner(&email).await?.is_some() {
            return Err(email_taken(&email));
        }

        let now = self.now();
        let user = self
            .users
            .save(UserDraft {
                id: None,
                email,
                first_name,
                last_name,
                phone_number: input.phone_number,
                is_active: input.is_active.unwrap_or(true),
                created_at: now,
                updated_at: now,
            })
            .await
            .map_err(Self::map_repository_error)?;
        info!(user_id = %user.id, "user created");

        let event = user_event(USER_CREATED, &user).with_metadata(json!({
            "email": user.email,
            "firstName": user.first_name,
            "lastName": user.last_name,
            "isActive": user.is_active,
        }));
        self.emitter.emit(event).await;
        Ok(user)
    }

    async fn update(&self, patch: UserPatch) -> Result<User, Error> {
        let raw_id = patch.id.clone().ok_or_else(|| missing("id"))?;
        if let Some(first_name) = &patch.first_name {
            validate_name("firstName", first_name).map_err(|err| invalid("firstName", err))?;
        }
        if let Some(last_name) = &patch.last_name {
            validate_name("lastName", last_name).map_err(|err| invalid("lastName", err))?;
        }
        if let Some(email) = &patch.email {
            validate_email(email).map_err(|err| invalid("email", err))?;
        }

        let previous = self.existing(&raw_id).await?;
        if let Some(email) = patch.email.as_deref().filter(|email| *email != previous.email) {
            let owner = self.email_owner(email).await?;
            if owner.is_some_and(|owner| owner.id != previous.id) {
                return Err(email_taken(email));
            }
        }

        let updated_fields = patch.supplied_fields();
        let draft = patch.merge_into(&previous, self.now());
        let user = self
            .users
            .save(draft)
            .await
            .map_err(Self::map_repository_error)?;
        info!(user_id = %user.id, "user updated");

        let event = user_event(USER_UPDATED, &user).with_metadata(json!({
            "updatedFields": updated_fields,
            "previousValues": previous,
            "newValues": user,
        }));
        self.emitter.emit(event).await;
        Ok(user)
    }

    async fn delete(&self, id: &str) -> Result<User, Error> {
        let user = self.existing(id).await?;
        let removed = self
            .users
            .delete(&user.id)
            .await
            .map_err(Self::map_repository_error)?;
        if !removed {
            return Err(Error::not_found(format!("user '{id}' not found")));
        }
        info!(user_id = %user.id, "user deleted");

        let event = user_event(USER_DELETED, &user).with_metadata(json!({ "deletedUser": user }));
        self.emitter.emit(event).await;
        Ok(user)
    }

    async fn activate(&self, id: &str) -> Result<User, Error> {
        self.update(UserPatch::activation(id, true)).await
    }

    async fn deactivate(&self, id: &str) -> Result<User, Error> {
        self.update(UserPatch::activation(id, false)).await
    }
}

#[async_trait]
impl<R> UserQuery for UserService<R>
where
    R: UserRepository,
{
    async fn list(&self, filter: UserFilter, request: PageRequest) -> Result<Page<User>, Error> {
        ensure_sortable(&request, USER_SORT_FIELDS)?;
        self.users
            .find_page(&filter, &request)
            .await
            .map_err(Self::map_repository_error)
    }

    async fn find_by_id(&self, id: &str) -> Result<User, Error> {
        self.existing(id).await
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
