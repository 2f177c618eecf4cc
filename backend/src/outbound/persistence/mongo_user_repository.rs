//! MongoDB-backed `UserRepository` implementation.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use pagination::{Page, PageRequest};

use super::documents::{
    DocumentError, UserDocument, page_limit, parse_object_id, sort_document,
    user_filter_document,
};
use super::mongo_error_mapping::map_mongo_error;
use super::mongo_store::{MongoStore, USERS_COLLECTION};
use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{User, UserDraft, UserFilter, UserId};

/// User repository over the `users` collection.
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    /// Create a repository bound to the store's `users` collection.
    pub fn new(store: &MongoStore) -> Self {
        Self {
            collection: store.collection(USERS_COLLECTION),
        }
    }

    async fn find_one(
        &self,
        filter: mongodb::bson::Document,
    ) -> Result<Option<User>, UserRepositoryError> {
        self.collection
            .find_one(filter)
            .await
            .map_err(map_error)?
            .map(UserDocument::into_domain)
            .transpose()
            .map_err(map_document_error)
    }
}

fn map_error(error: mongodb::error::Error) -> UserRepositoryError {
    map_mongo_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
        UserRepositoryError::duplicate,
    )
}

fn map_document_error(error: DocumentError) -> UserRepositoryError {
    UserRepositoryError::query(error.to_string())
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        match parse_object_id(id.as_ref()) {
            Some(oid) => self.find_one(doc! { "_id": oid }).await,
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        self.find_one(doc! { "email": email }).await
    }

    async fn find_page(
        &self,
        filter: &UserFilter,
        request: &PageRequest,
    ) -> Result<Page<User>, UserRepositoryError> {
        let query = user_filter_document(filter);
        let total = self
            .collection
            .count_documents(query.clone())
            .await
            .map_err(map_error)?;
        let documents: Vec<UserDocument> = self
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
            .map(UserDocument::into_domain)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_document_error)?;
        Ok(Page::new(items, request, total))
    }

    async fn save(&self, draft: UserDraft) -> Result<User, UserRepositoryError> {
        let Some(id) = &draft.id else {
            let document = UserDocument::from_draft(ObjectId::new(), &draft);
            self.collection
                .insert_one(&document)
                .await
                .map_err(map_error)?;
            return document.into_domain().map_err(map_document_error);
        };
        let oid = parse_object_id(id.as_ref()).ok_or_else(|| {
            UserRepositoryError::query(format!("user id '{id}' is not an ObjectId"))
        })?;
        let document = UserDocument::from_draft(oid, &draft);
        self.collection
            .replace_one(doc! { "_id": oid }, &document)
            .upsert(true)
            .await
            .map_err(map_error)?;
        document.into_domain().map_err(map_document_error)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
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
