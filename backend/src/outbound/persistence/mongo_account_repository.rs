//! MongoDB-backed `AccountRepository` implementation.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use pagination::{Page, PageRequest};

use super::documents::{
    AccountDocument, DocumentError, account_filter_document, page_limit, parse_object_id,
    sort_document,
};
use super::mongo_error_mapping::map_mongo_error;
use super::mongo_store::{ACCOUNTS_COLLECTION, MongoStore};
use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::{Account, AccountDraft, AccountFilter, AccountId, Slug};

/// Account repository over the `accounts` collection.
#[derive(Clone)]
pub struct MongoAccountRepository {
    collection: Collection<AccountDocument>,
}

impl MongoAccountRepository {
    /// Create a repository bound to the store's `accounts` collection.
    pub fn new(store: &MongoStore) -> Self {
        Self {
            collection: store.collection(ACCOUNTS_COLLECTION),
        }
    }
}

fn map_error(error: mongodb::error::Error) -> AccountRepositoryError {
    map_mongo_error(
        error,
        AccountRepositoryError::query,
        AccountRepositoryError::connection,
        AccountRepositoryError::duplicate,
    )
}

fn map_document_error(error: DocumentError) -> AccountRepositoryError {
    AccountRepositoryError::query(error.to_string())
}

#[async_trait]
impl AccountRepository for MongoAccountRepository {
    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Account>, AccountRepositoryError> {
        self.collection
            .find_one(doc! { "slug": slug.to_string() })
            .await
            .map_err(map_error)?
            .map(AccountDocument::into_domain)
            .transpose()
            .map_err(map_document_error)
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError> {
        let Some(oid) = parse_object_id(id.as_ref()) else {
            return Ok(None);
        };
        self.collection
            .find_one(doc! { "_id": oid })
            .await
            .map_err(map_error)?
            .map(AccountDocument::into_domain)
            .transpose()
            .map_err(map_document_error)
    }

    async fn find_page(
        &self,
        filter: &AccountFilter,
        request: &PageRequest,
    ) -> Result<Page<Account>, AccountRepositoryError> {
        let query = account_filter_document(filter);
        let total = self
            .collection
            .count_documents(query.clone())
            .await
            .map_err(map_error)?;
        let documents: Vec<AccountDocument> = self
            .collection
            .find(query)
            .sort(sort_document(request))
            .skip(request.offset())
            .limit(page_limit(request))
            .await
            .map_err(map_error)?
            .try_collect()
            .await
            .map_err(map_error)?;
        let items = documents
            .into_iter()
            .map(AccountDocument::into_domain)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_document_error)?;
        Ok(Page::new(items, request, total))
    }

    async fn save(&self, draft: AccountDraft) -> Result<Account, AccountRepositoryError> {
        match &draft.id {
            None => {
                let document = AccountDocument::from_draft(ObjectId::new(), &draft);
                self.collection
                    .insert_one(&document)
                    .await
                    .map_err(map_error)?;
                document.into_domain().map_err(map_document_error)
            }
            Some(id) => {
                let oid = parse_object_id(id.as_ref()).ok_or_else(|| {
                    AccountRepositoryError::query(format!("account id '{id}' is not an ObjectId"))
                })?;
                let document = AccountDocument::from_draft(oid, &draft);
                self.collection
                    .replace_one(doc! { "_id": oid }, &document)
                    .upsert(true)
                    .await
                    .map_err(map_error)?;
                document.into_domain().map_err(map_document_error)
            }
        }
    }

    async fn delete(&self, id: &AccountId) -> Result<bool, AccountRepositoryError> {
        let Some(oid) = parse_object_id(id.as_ref()) else {
            return Ok(false);
        };
        let result = self
            .collection
            .delete_one(doc! { "_id": oid })
            .await
            .map_err(map_error)?;
        Ok(result.deleted_count > 0)
    }
}
