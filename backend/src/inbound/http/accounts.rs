//! Account HTTP handlers.
//!
//! ```text
//! GET    /accounts?userId=&page=&pageSize=&sortField=&sortOrder=
//! GET    /accounts/{slug}
//! POST   /accounts
//! PUT    /accounts
//! DELETE /accounts/{slug}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{Account, AccountFilter, AccountPatch, CreateAccountInput, Error, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::paging::PageQuery;
use crate::inbound::http::schemas::{
    AccountPageSchema, AccountPatchSchema, AccountSchema, CreateAccountSchema, ErrorSchema,
    MessageResponse,
};
use crate::inbound::http::state::AccountHttpState;
use crate::inbound::http::validation::{FieldName, invalid_value_error};

/// Filters accepted by `GET /accounts`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct AccountListQuery {
    /// Only return accounts owned by this user.
    pub user_id: Option<String>,
}

impl AccountListQuery {
    fn into_filter(self) -> Result<AccountFilter, Error> {
        let user_id = self
            .user_id
            .map(|raw| {
                UserId::new(raw.as_str())
                    .map_err(|err| invalid_value_error(FieldName::new("userId"), &raw, err))
            })
            .transpose()?;
        Ok(AccountFilter { user_id })
    }
}

/// List accounts, optionally filtered by owner.
#[utoipa::path(
    get,
    path = "/accounts",
    params(AccountListQuery, PageQuery),
    responses(
        (status = 200, description = "Page of accounts", body = AccountPageSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "listAccounts"
)]
#[get("/accounts")]
pub async fn list_accounts(
    state: web::Data<AccountHttpState>,
    filter: web::Query<AccountListQuery>,
    paging: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let filter = filter.into_inner().into_filter()?;
    let request = paging.into_inner().into_page_request()?;
    let page = state.accounts_query.list(filter, request).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Fetch one account by slug.
#[utoipa::path(
    get,
    path = "/accounts/{slug}",
    params(("slug" = String, Path, description = "Account slug")),
    responses(
        (status = 200, description = "Account", body = AccountSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "getAccount"
)]
#[get("/accounts/{slug}")]
pub async fn get_account(
    state: web::Data<AccountHttpState>,
    slug: web::Path<String>,
) -> ApiResult<web::Json<Account>> {
    let account = state.accounts_query.get_by_slug(&slug).await?;
    Ok(web::Json(account))
}

/// Create an account for an existing user.
#[utoipa::path(
    post,
    path = "/accounts",
    request_body = CreateAccountSchema,
    responses(
        (status = 201, description = "Account created", body = AccountSchema),
        (status = 400, description = "Invalid request or unknown user", body = ErrorSchema),
        (status = 409, description = "Slug already taken", body = ErrorSchema),
        (status = 503, description = "User service unavailable", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "createAccount"
)]
#[post("/accounts")]
pub async fn create_account(
    state: web::Data<AccountHttpState>,
    payload: web::Json<CreateAccountInput>,
) -> ApiResult<HttpResponse> {
    let account = state.accounts.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(account))
}

/// Merge a partial update into the account named by `slug` in the body.
#[utoipa::path(
    put,
    path = "/accounts",
    request_body = AccountPatchSchema,
    responses(
        (status = 200, description = "Updated account", body = AccountSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "updateAccount"
)]
#[put("/accounts")]
pub async fn update_account(
    state: web::Data<AccountHttpState>,
    payload: web::Json<AccountPatch>,
) -> ApiResult<web::Json<Account>> {
    let account = state.accounts.update(payload.into_inner()).await?;
    Ok(web::Json(account))
}

/// Delete an account by slug.
#[utoipa::path(
    delete,
    path = "/accounts/{slug}",
    params(("slug" = String, Path, description = "Account slug")),
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "deleteAccount"
)]
#[delete("/accounts/{slug}")]
pub async fn delete_account(
    state: web::Data<AccountHttpState>,
    slug: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let account = state.accounts.delete(&slug).await?;
    Ok(web::Json(MessageResponse::new(format!(
        "Account '{}' deleted",
        account.slug
    ))))
}

/// Register the account routes on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_accounts)
        .service(get_account)
        .service(create_account)
        .service(update_account)
        .service(delete_account);
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
