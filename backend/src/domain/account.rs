//! Account records owned by the account service.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{Slug, UserId};

/// Wire names of the fields an account listing may be sorted by.
pub const ACCOUNT_SORT_FIELDS: &[&str] = &["createdAt", "updatedAt", "slug", "name", "score"];

/// Validation errors for account fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    /// Identifier was blank or padded with whitespace.
    #[error("account id must be a non-empty, trimmed string")]
    InvalidId,
    /// Name was blank once trimmed.
    #[error("name must not be blank")]
    BlankName,
    /// Score was zero, negative, or not finite.
    #[error("score must be a positive number")]
    InvalidScore,
}

/// Store-assigned account identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Validate and construct an identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, AccountValidationError> {
        let id = id.into();
        if id.is_empty() || id.trim() != id {
            return Err(AccountValidationError::InvalidId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.0
    }
}

impl TryFrom<String> for AccountId {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Persisted account.
///
/// `user_id` is a soft reference: it was confirmed against the user service
/// when the account was created, nothing enforces it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub slug: Slug,
    pub user_id: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An account ready to be saved; `id` is `None` until the store assigns one.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountDraft {
    pub id: Option<AccountId>,
    pub slug: Slug,
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub score: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountDraft {
    /// Attach a store-assigned identifier, producing the persisted record.
    pub fn into_account(self, id: AccountId) -> Account {
        Account {
            id,
            slug: self.slug,
            user_id: self.user_id,
            name: self.name,
            description: self.description,
            score: self.score,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Creation input. Every field is optional at the type level so that
/// missing values surface as validation errors from the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountInput {
    pub user_id: Option<String>,
    pub slug: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub score: Option<f64>,
}

/// Partial update addressed by `slug`.
///
/// `id` and `user_id` exist only so that their presence can be rejected.
/// `description` distinguishes an omitted field (`None`) from an explicit
/// `null` (`Some(None)`), which clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPatch {
    pub id: Option<String>,
    pub user_id: Option<String>,
    pub slug: Option<String>,
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    pub score: Option<f64>,
}

/// Wrap any value that appears in the payload, `null` included, in `Some`.
fn present_field<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl AccountPatch {
    /// Wire names of the fields carried by the patch, in declaration order.
    pub fn supplied_fields(&self) -> Vec<&'static str> {
        [
            ("id", self.id.is_some()),
            ("userId", self.user_id.is_some()),
            ("slug", self.slug.is_some()),
            ("name", self.name.is_some()),
            ("description", self.description.is_some()),
            ("score", self.score.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }

    /// Shallow-merge the mutable fields over `existing`, refreshing
    /// `updated_at`. Identity, owner, and slug are kept from `existing`.
    pub fn merge_into(self, existing: &Account, now: DateTime<Utc>) -> AccountDraft {
        AccountDraft {
            id: Some(existing.id.clone()),
            slug: existing.slug.clone(),
            user_id: existing.user_id.clone(),
            name: self.name.unwrap_or_else(|| existing.name.clone()),
            description: self
                .description
                .unwrap_or_else(|| existing.description.clone()),
            score: self.score.or(existing.score),
            created_at: existing.created_at,
            updated_at: now,
        }
    }
}

/// Listing filter for accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountFilter {
    pub user_id: Option<UserId>,
}

/// Reject blank account names.
pub fn validate_account_name(name: &str) -> Result<(), AccountValidationError> {
    if name.trim().is_empty() {
        Err(AccountValidationError::BlankName)
    } else {
        Ok(())
    }
}

/// Accept absent scores or positive finite ones.
pub fn validate_score(score: Option<f64>) -> Result<(), AccountValidationError> {
    match score {
        Some(value) if !value.is_finite() || value <= 0.0 => {
            Err(AccountValidationError::InvalidScore)
        }
        _ => Ok(()),
    }
}
