//! User HTTP handlers.
//!
//! ```text
//! GET    /users?isActive=&page=&pageSize=&sortField=&sortOrder=
//! GET    /users/{id}
//! POST   /users
//! PUT    /users
//! DELETE /users/{id}
//! PUT    /users/{id}/activate
//! PUT    /users/{id}/deactivate
//! ```
//!
//! `GET /users/{id}` doubles as the lookup the account service calls before
//! creating an account.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{CreateUserInput, User, UserFilter, UserPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::paging::PageQuery;
use crate::inbound::http::schemas::{
    CreateUserSchema, ErrorSchema, MessageResponse, UserPageSchema, UserPatchSchema, UserSchema,
};
use crate::inbound::http::state::UserHttpState;

/// Filters accepted by `GET /users`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct UserListQuery {
    /// Only return users with this activation state.
    pub is_active: Option<bool>,
}

/// List users, optionally filtered by activation state.
#[utoipa::path(
    get,
    path = "/users",
    params(UserListQuery, PageQuery),
    responses(
        (status = 200, description = "Page of users", body = UserPageSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<UserHttpState>,
    filter: web::Query<UserListQuery>,
    paging: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let filter = UserFilter {
        is_active: filter.into_inner().is_active,
    };
    let request = paging.into_inner().into_page_request()?;
    let page = state.users_query.list(filter, request).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Fetch one user by id.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<UserHttpState>,
    id: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let user = state.users_query.find_by_id(&id).await?;
    Ok(web::Json(user))
}

/// Register a user.
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserSchema,
    responses(
        (status = 201, description = "User created", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<UserHttpState>,
    payload: web::Json<CreateUserInput>,
) -> ApiResult<HttpResponse> {
    let user = state.users.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Merge a partial update into the user named by `id` in the body.
#[utoipa::path(
    put,
    path = "/users",
    request_body = UserPatchSchema,
    responses(
        (status = 200, description = "Updated user", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users")]
pub async fn update_user(
    state: web::Data<UserHttpState>,
    payload: web::Json<UserPatch>,
) -> ApiResult<web::Json<User>> {
    let user = state.users.update(payload.into_inner()).await?;
    Ok(web::Json(user))
}

/// Delete a user by id.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<UserHttpState>,
    id: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let user = state.users.delete(&id).await?;
    Ok(web::Json(MessageResponse::new(format!(
        "User '{}' deleted",
        user.id
    ))))
}

/// Mark a user active.
#[utoipa::path(
    put,
    path = "/users/{id}/activate",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Active user", body = UserSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "activateUser"
)]
#[put("/users/{id}/activate")]
pub async fn activate_user(
    state: web::Data<UserHttpState>,
    id: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let user = state.users.activate(&id).await?;
    Ok(web::Json(user))
}

/// Mark a user inactive.
#[utoipa::path(
    put,
    path = "/users/{id}/deactivate",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Inactive user", body = UserSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deactivateUser"
)]
#[put("/users/{id}/deactivate")]
pub async fn deactivate_user(
    state: web::Data<UserHttpState>,
    id: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let user = state.users.deactivate(&id).await?;
    Ok(web::Json(user))
}

/// Register the user routes on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_users)
        .service(get_user)
        .service(create_user)
        .service(update_user)
        .service(delete_user)
        .service(activate_user)
        .service(deactivate_user);
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
