//! Persistence adapters for the account, user, and statistics stores.
//!
//! Two families implement the domain repository ports:
//!
//! - **MongoDB**: one collection per service, reached through a shared
//!   [`MongoStore`]. Documents are internal to this module; repositories only
//!   translate between documents and domain records.
//! - **In-memory**: process-local maps used when no store URI is configured,
//!   mainly for local runs and integration tests.
//!
//! Driver errors are mapped onto the port error types so the services never
//! see `mongodb` types.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{MongoAccountRepository, MongoStore};
//!
//! let store = MongoStore::connect("mongodb://localhost:27017", "accounts").await?;
//! store.ensure_indexes().await?;
//! let repo = MongoAccountRepository::new(&store);
//! ```

mod documents;
mod memory;
mod mongo_account_repository;
mod mongo_error_mapping;
mod mongo_statistics_repository;
mod mongo_store;
mod mongo_user_repository;

pub use memory::{InMemoryAccountRepository, InMemoryStatisticsRepository, InMemoryUserRepository};
pub use mongo_account_repository::MongoAccountRepository;
pub use mongo_statistics_repository::MongoStatisticsRepository;
pub use mongo_store::{
    ACCOUNTS_COLLECTION, MongoStore, STATISTICS_COLLECTION, StoreError, USERS_COLLECTION,
};
pub use mongo_user_repository::MongoUserRepository;
