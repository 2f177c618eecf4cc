//! User records owned by the user service.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum length of a first or last name.
pub const NAME_MIN: usize = 1;
/// Maximum length of a first or last name.
pub const NAME_MAX: usize = 50;

/// Wire names of the fields a user listing may be sorted by.
pub const USER_SORT_FIELDS: &[&str] = &["createdAt", "updatedAt", "email", "firstName", "lastName"];

/// Validation errors for user identifiers and fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Identifier was blank or padded with whitespace.
    #[error("user id must be a non-empty, trimmed string")]
    InvalidId,
    /// Email address did not have a `local@domain` shape.
    #[error("email must be a valid address")]
    InvalidEmail,
    /// Name length outside `NAME_MIN..=NAME_MAX`.
    #[error("{field} must be between {min} and {max} characters")]
    NameLength {
        /// Wire name of the offending field.
        field: &'static str,
        /// Minimum accepted length.
        min: usize,
        /// Maximum accepted length.
        max: usize,
    },
}

/// Store-assigned user identifier.
///
/// The value is opaque: MongoDB renders object ids as 24 hex characters,
/// other stores may use UUIDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct an identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.is_empty() || id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Persisted user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user ready to be saved; `id` is `None` until the store assigns one.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDraft {
    pub id: Option<UserId>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserDraft {
    /// Attach a store-assigned identifier, producing the persisted record.
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: self.phone_number,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Registration input. Every field is optional at the type level so that
/// missing values surface as validation errors from the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub is_active: Option<bool>,
}

/// Partial update. `id` selects the target; every other supplied field
/// replaces the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub id: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub is_active: Option<bool>,
}

impl UserPatch {
    /// Patch toggling only the activation flag.
    pub fn activation(id: impl Into<String>, is_active: bool) -> Self {
        Self {
            id: Some(id.into()),
            is_active: Some(is_active),
            ..Self::default()
        }
    }

    /// Wire names of the fields carried by the patch, in declaration order.
    pub fn supplied_fields(&self) -> Vec<&'static str> {
        [
            ("id", self.id.is_some()),
            ("email", self.email.is_some()),
            ("firstName", self.first_name.is_some()),
            ("lastName", self.last_name.is_some()),
            ("phoneNumber", self.phone_number.is_some()),
            ("isActive", self.is_active.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }

    /// Shallow-merge the patch over `existing`, refreshing `updated_at`.
    pub fn merge_into(self, existing: &User, now: DateTime<Utc>) -> UserDraft {
        UserDraft {
            id: Some(existing.id.clone()),
            email: self.email.unwrap_or_else(|| existing.email.clone()),
            first_name: self.first_name.unwrap_or_else(|| existing.first_name.clone()),
            last_name: self.last_name.unwrap_or_else(|| existing.last_name.clone()),
            phone_number: self.phone_number.or_else(|| existing.phone_number.clone()),
            is_active: self.is_active.unwrap_or(existing.is_active),
            created_at: existing.created_at,
            updated_at: now,
        }
    }
}

/// Listing filter for users.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub is_active: Option<bool>,
}

/// Check that `email` has a `local@domain` shape with a dotted domain.
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(UserValidationError::InvalidEmail);
    };
    let well_formed = !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace);
    if well_formed {
        Ok(())
    } else {
        Err(UserValidationError::InvalidEmail)
    }
}

/// Check a first or last name against the length bounds.
pub fn validate_name(field: &'static str, value: &str) -> Result<(), UserValidationError> {
    let length = value.trim().chars().count();
    if (NAME_MIN..=NAME_MAX).contains(&length) {
        Ok(())
    } else {
        Err(UserValidationError::NameLength {
            field,
            min: NAME_MIN,
            max: NAME_MAX,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn stored_user() -> User {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().expect("timestamp");
        User {
            id: UserId::new("u-1").expect("valid id"),
            email: "ada@example.com".to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            phone_number: None,
            is_active: true,
            created_at: created,
            updated_at: created,
        }
    }

    #[rstest]
    #[case("ada@example.com", true)]
    #[case("a@b.io", true)]
    #[case("ada.example.com", false)]
    #[case("@example.com", false)]
    #[case("ada@", false)]
    #[case("ada@localhost", false)]
    #[case("ada@@example.com", false)]
    #[case("ada @example.com", false)]
    fn email_shape(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(validate_email(raw).is_ok(), valid);
    }

    #[rstest]
    #[case("", false)]
    #[case("A", true)]
    #[case(&"x".repeat(NAME_MAX), true)]
    #[case(&"x".repeat(NAME_MAX + 1), false)]
    fn name_bounds(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(validate_name("firstName", raw).is_ok(), valid);
    }

    #[rstest]
    fn merge_keeps_unsupplied_fields_and_identity() {
        let existing = stored_user();
        let later = existing.created_at + chrono::TimeDelta::hours(1);
        let patch = UserPatch {
            id: Some(existing.id.to_string()),
            last_name: Some("Byron".to_owned()),
            ..UserPatch::default()
        };

        let merged = patch.merge_into(&existing, later);
        assert_eq!(merged.id, Some(existing.id.clone()));
        assert_eq!(merged.first_name, "Ada");
        assert_eq!(merged.last_name, "Byron");
        assert_eq!(merged.created_at, existing.created_at);
        assert_eq!(merged.updated_at, later);
    }

    #[rstest]
    fn supplied_fields_lists_wire_names() {
        let patch = UserPatch::activation("u-1", false);
        assert_eq!(patch.supplied_fields(), vec!["id", "isActive"]);
    }

    #[rstest]
    fn user_serialises_camel_case() {
        let value = serde_json::to_value(stored_user()).expect("serialise user");
        assert_eq!(value["firstName"], "Ada");
        assert_eq!(value["isActive"], true);
        assert!(value.get("phoneNumber").is_none());
    }
}
