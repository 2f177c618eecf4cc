//! Human-readable account keys.
//!
//! Any non-blank text up to [`SLUG_MAX`] characters is a slug. Case and
//! punctuation are kept as supplied, so `Acme` and `acme` are distinct keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum slug length in characters.
pub const SLUG_MAX: usize = 64;

/// Validation errors returned by [`Slug::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlugValidationError {
    /// The slug was empty or only whitespace.
    #[error("slug must not be blank")]
    Blank,
    /// The slug exceeded [`SLUG_MAX`].
    #[error("slug must be at most {max} characters")]
    TooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

/// Unique human key of an account.
///
/// # Examples
/// ```
/// use account_platform::domain::Slug;
///
/// let slug = Slug::new("acme-42").expect("valid slug");
/// assert_eq!(slug.as_ref(), "acme-42");
/// assert!(Slug::new("Acme Corp").is_ok());
/// assert!(Slug::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Validate and construct a slug.
    pub fn new(value: impl Into<String>) -> Result<Self, SlugValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(SlugValidationError::Blank);
        }
        if value.chars().count() > SLUG_MAX {
            return Err(SlugValidationError::TooLong { max: SLUG_MAX });
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("acme")]
    #[case("acme-42")]
    #[case("Acme")]
    #[case("acme_corp")]
    #[case("Acme Corp")]
    fn accepts_any_non_blank_text(#[case] raw: &str) {
        assert_eq!(Slug::new(raw).expect("valid slug").as_ref(), raw);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn rejects_blank_slugs(#[case] raw: &str) {
        assert_eq!(Slug::new(raw).expect_err("blank slug"), SlugValidationError::Blank);
    }

    #[rstest]
    fn rejects_overlong_slugs() {
        let raw = "a".repeat(SLUG_MAX + 1);
        assert_eq!(
            Slug::new(raw).expect_err("too long"),
            SlugValidationError::TooLong { max: SLUG_MAX }
        );
    }

    #[rstest]
    fn deserialisation_validates() {
        assert!(serde_json::from_str::<Slug>("\"  \"").is_err());
        let slug: Slug = serde_json::from_str("\"fine\"").expect("valid slug");
        assert_eq!(slug.as_ref(), "fine");
    }
}
