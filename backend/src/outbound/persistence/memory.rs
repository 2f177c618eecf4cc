//! Process-local repositories used when no document store is configured.
//!
//! Records live behind a `tokio::sync::RwLock` and disappear with the
//! process. Uniqueness of account slugs and user emails is checked under the
//! write lock so concurrent creates cannot both succeed. Identifiers use the
//! same hex `ObjectId` shape as the MongoDB adapters.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use pagination::{Page, PageRequest};
use tokio::sync::RwLock;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, StatisticsRepository, StatisticsRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::{
    Account, AccountDraft, AccountFilter, AccountId, NewStatisticsEvent, Slug, StatisticsEvent,
    StatisticsFilter, User, UserDraft, UserFilter, UserId,
};

/// Comparable projection of a sortable field.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
enum SortKey {
    Missing,
    Number(f64),
    Text(String),
    Time(DateTime<Utc>),
}

fn compare_keys(left: &SortKey, right: &SortKey) -> Ordering {
    left.partial_cmp(right).unwrap_or(Ordering::Equal)
}

/// Order `items` by the requested field, breaking ties by `id`.
fn sort_records<T>(
    items: &mut [T],
    request: &PageRequest,
    key: impl Fn(&T, &str) -> SortKey,
    id: impl Fn(&T) -> &str,
) {
    let field = request.sort_field();
    let ascending = request.sort_order().is_ascending();
    items.sort_by(|left, right| {
        let ordering = compare_keys(&key(left, field), &key(right, field))
            .then_with(|| id(left).cmp(id(right)));
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });
}

fn next_id() -> String {
    ObjectId::new().to_hex()
}

fn account_sort_key(account: &Account, field: &str) -> SortKey {
    match field {
        "createdAt" => SortKey::Time(account.created_at),
        "updatedAt" => SortKey::Time(account.updated_at),
        "slug" => SortKey::Text(account.slug.to_string()),
        "name" => SortKey::Text(account.name.clone()),
        "score" => account.score.map_or(SortKey::Missing, SortKey::Number),
        _ => SortKey::Missing,
    }
}

fn user_sort_key(user: &User, field: &str) -> SortKey {
    match field {
        "createdAt" => SortKey::Time(user.created_at),
        "updatedAt" => SortKey::Time(user.updated_at),
        "email" => SortKey::Text(user.email.clone()),
        "firstName" => SortKey::Text(user.first_name.clone()),
        "lastName" => SortKey::Text(user.last_name.clone()),
        _ => SortKey::Missing,
    }
}

fn event_sort_key(event: &StatisticsEvent, field: &str) -> SortKey {
    match field {
        "createdAt" => SortKey::Time(event.created_at),
        "eventType" => SortKey::Text(event.event_type.clone()),
        "userId" => SortKey::Text(event.user_id.clone()),
        "entitySlug" => SortKey::Text(event.entity_slug.clone()),
        _ => SortKey::Missing,
    }
}

/// In-memory account store keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    records: RwLock<BTreeMap<AccountId, Account>>,
}

impl InMemoryAccountRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Account>, AccountRepositoryError> {
        let records = self.records.read().await;
        Ok(records.values().find(|account| &account.slug == slug).cloned())
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn find_page(
        &self,
        filter: &AccountFilter,
        request: &PageRequest,
    ) -> Result<Page<Account>, AccountRepositoryError> {
        let mut matching: Vec<Account> = self
            .records
            .read()
            .await
            .values()
            .filter(|account| {
                filter
                    .user_id
                    .as_ref()
                    .is_none_or(|wanted| wanted == &account.user_id)
            })
            .cloned()
            .collect();
        sort_records(&mut matching, request, account_sort_key, |account| {
            account.id.as_ref()
        });
        Ok(request.paginate(matching))
    }

    async fn save(&self, draft: AccountDraft) -> Result<Account, AccountRepositoryError> {
        let mut records = self.records.write().await;
        let id = match &draft.id {
            Some(id) => id.clone(),
            None => AccountId::new(next_id())
                .map_err(|err| AccountRepositoryError::query(err.to_string()))?,
        };
        let taken = records
            .values()
            .any(|account| account.slug == draft.slug && account.id != id);
        if taken {
            return Err(AccountRepositoryError::duplicate(format!(
                "slug '{}' is already in use",
                draft.slug
            )));
        }
        let account = draft.into_account(id.clone());
        records.insert(id, account.clone());
        Ok(account)
    }

    async fn delete(&self, id: &AccountId) -> Result<bool, AccountRepositoryError> {
        Ok(self.records.write().await.remove(id).is_some())
    }
}

/// In-memory user store keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    records: RwLock<BTreeMap<UserId, User>>,
}

impl InMemoryUserRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        let records = self.records.read().await;
        Ok(records.values().find(|user| user.email == email).cloned())
    }

    async fn find_page(
        &self,
        filter: &UserFilter,
        request: &PageRequest,
    ) -> Result<Page<User>, UserRepositoryError> {
        let mut matching: Vec<User> = self
            .records
            .read()
            .await
            .values()
            .filter(|user| filter.is_active.is_none_or(|wanted| wanted == user.is_active))
            .cloned()
            .collect();
        sort_records(&mut matching, request, user_sort_key, |user| user.id.as_ref());
        Ok(request.paginate(matching))
    }

    async fn save(&self, draft: UserDraft) -> Result<User, UserRepositoryError> {
        let mut records = self.records.write().await;
        let id = match &draft.id {
            Some(id) => id.clone(),
            None => UserId::new(next_id())
                .map_err(|err| UserRepositoryError::query(err.to_string()))?,
        };
        let taken = records
            .values()
            .any(|user| user.email == draft.email && user.id != id);
        if taken {
            return Err(UserRepositoryError::duplicate(format!(
                "email '{}' is already in use",
                draft.email
            )));
        }
        let user = draft.into_user(id.clone());
        records.insert(id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        Ok(self.records.write().await.remove(id).is_some())
    }
}

/// Append-only in-memory event log.
#[derive(Debug, Default)]
pub struct InMemoryStatisticsRepository {
    events: RwLock<Vec<StatisticsEvent>>,
}

impl InMemoryStatisticsRepository {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatisticsRepository for InMemoryStatisticsRepository {
    async fn find_page(
        &self,
        filter: &StatisticsFilter,
        request: &PageRequest,
    ) -> Result<Page<StatisticsEvent>, StatisticsRepositoryError> {
        let mut matching: Vec<StatisticsEvent> = self
            .events
            .read()
            .await
            .iter()
            .filter(|event| filter.matches(event))
            .cloned()
            .collect();
        sort_records(&mut matching, request, event_sort_key, |event| {
            event.id.as_str()
        });
        Ok(request.paginate(matching))
    }

    async fn insert(
        &self,
        event: NewStatisticsEvent,
        created_at: DateTime<Utc>,
    ) -> Result<StatisticsEvent, StatisticsRepositoryError> {
        let stored = event.into_event(next_id(), created_at);
        self.events.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn count_by_event_type(
        &self,
    ) -> Result<BTreeMap<String, u64>, StatisticsRepositoryError> {
        let events = self.events.read().await;
        let mut counts = BTreeMap::new();
        for event in events.iter() {
            *counts.entry(event.event_type.clone()).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
