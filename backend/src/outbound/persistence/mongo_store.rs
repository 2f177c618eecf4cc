//! MongoDB connection handle shared by the document repositories.
//!
//! The store owns one `mongodb::Client` (which pools connections
//! internally) and the database the service writes to. Unique indexes that
//! back the slug and email invariants are created on start-up.

use mongodb::bson::{Document, doc};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

/// Collection holding account documents.
pub const ACCOUNTS_COLLECTION: &str = "accounts";
/// Collection holding user documents.
pub const USERS_COLLECTION: &str = "users";
/// Collection holding statistics documents.
pub const STATISTICS_COLLECTION: &str = "statistics";

/// Errors raised while connecting to or preparing the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The client could not be created or the server did not answer.
    #[error("failed to connect to document store: {message}")]
    Connect { message: String },

    /// An index could not be created.
    #[error("failed to create index on {collection}: {message}")]
    Index {
        collection: &'static str,
        message: String,
    },
}

impl StoreError {
    /// Create a connect error with the given message.
    pub fn connect(message: impl Into<String>) -> Self {
        Self::Connect {
            message: message.into(),
        }
    }
}

/// Handle to the service database.
#[derive(Clone, Debug)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Connect to `uri` and verify the server answers a `ping`.
    ///
    /// # Errors
    /// Returns [`StoreError::Connect`] when the URI is invalid or the server
    /// cannot be reached.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|err| StoreError::connect(err.to_string()))?;
        let database = client.database(database);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|err| StoreError::connect(err.to_string()))?;
        info!(database = %database.name(), "connected to document store");
        Ok(Self { database })
    }

    /// Typed handle to `name`.
    pub fn collection<T>(&self, name: &str) -> Collection<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        self.database.collection::<T>(name)
    }

    /// Create the unique indexes on `accounts.slug` and `users.email`.
    ///
    /// # Errors
    /// Returns [`StoreError::Index`] when the server rejects an index, for
    /// example because existing data already violates it.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        self.unique_index(ACCOUNTS_COLLECTION, doc! { "slug": 1 })
            .await?;
        self.unique_index(USERS_COLLECTION, doc! { "email": 1 })
            .await?;
        self.database
            .collection::<Document>(STATISTICS_COLLECTION)
            .create_index(IndexModel::builder().keys(doc! { "eventType": 1 }).build())
            .await
            .map_err(|err| StoreError::Index {
                collection: STATISTICS_COLLECTION,
                message: err.to_string(),
            })?;
        Ok(())
    }

    async fn unique_index(&self, collection: &'static str, keys: Document) -> Result<(), StoreError> {
        let model = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.database
            .collection::<Document>(collection)
            .create_index(model)
            .await
            .map_err(|err| StoreError::Index {
                collection,
                message: err.to_string(),
            })?;
        Ok(())
    }
}
