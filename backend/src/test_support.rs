//! Shared fixtures for unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{Account, AccountId, Slug, User, UserId};

/// Timestamp every fixture clock reports.
pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

/// Clock frozen at [`fixture_timestamp`].
pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

/// Stored account owned by user `u-1`, created an hour before the fixture
/// clock.
pub(crate) fn stored_account(slug: &str) -> Account {
    let created = fixture_timestamp() - chrono::TimeDelta::hours(1);
    Account {
        id: AccountId::new(format!("acc-{slug}")).expect("fixture account id"),
        slug: Slug::new(slug).expect("fixture slug"),
        user_id: UserId::new("u-1").expect("fixture user id"),
        name: "Acme".to_owned(),
        description: Some("Fixture account".to_owned()),
        score: Some(3.5),
        created_at: created,
        updated_at: created,
    }
}

/// Stored active user with the given id and email.
pub(crate) fn stored_user(id: &str, email: &str) -> User {
    let created = fixture_timestamp() - chrono::TimeDelta::hours(1);
    User {
        id: UserId::new(id).expect("fixture user id"),
        email: email.to_owned(),
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        phone_number: None,
        is_active: true,
        created_at: created,
        updated_at: created,
    }
}
