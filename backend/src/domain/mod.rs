//! Domain primitives, services, and ports.
//!
//! Purpose: hold the account, user, and statistics entities together with the
//! services that enforce their rules. Nothing here knows about HTTP or
//! MongoDB; adapters reach the domain through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode — transport-agnostic failure payload.
//! - Account, User, StatisticsEvent — persisted entities.
//! - AccountService, UserService, StatisticsService — driving-port
//!   implementations.
//! - StatisticsEmitter — best-effort publisher used after writes.

pub mod account;
mod account_service;
pub mod error;
mod paging;
pub mod ports;
pub mod slug;
pub mod statistics;
mod statistics_emitter;
mod statistics_service;
pub mod trace_id;
pub mod user;
mod user_service;

pub use self::account::{
    ACCOUNT_SORT_FIELDS, Account, AccountDraft, AccountFilter, AccountId, AccountPatch,
    AccountValidationError, CreateAccountInput, validate_account_name, validate_score,
};
pub use self::account_service::AccountService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::paging::ensure_sortable;
pub use self::slug::{SLUG_MAX, Slug, SlugValidationError};
pub use self::statistics::{
    ACCOUNT_CREATED, ACCOUNT_DELETED, ACCOUNT_UPDATED, EventCounts, NewStatisticsEvent,
    STATISTICS_SORT_FIELDS, StatisticsEvent, StatisticsFilter, USER_CREATED, USER_DELETED,
    USER_UPDATED,
};
pub use self::statistics_emitter::StatisticsEmitter;
pub use self::statistics_service::StatisticsService;
pub use self::trace_id::TraceId;
pub use self::user::{
    CreateUserInput, NAME_MAX, NAME_MIN, USER_SORT_FIELDS, User, UserDraft, UserFilter, UserId,
    UserPatch, UserValidationError, validate_email, validate_name,
};
pub use self::user_service::UserService;

