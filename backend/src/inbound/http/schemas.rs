//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the structure of their corresponding domain
//! types but live in the inbound adapter layer where framework concerns belong.

use serde::Serialize;
use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// A slug or email is already taken.
    #[schema(rename = "conflict")]
    Conflict,
    /// A required dependency could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "slug is required")]
    message: String,
    /// Correlation identifier for tracing this error across services.
    #[schema(example = "6f1c1e58-3b9a-4a8e-9a65-0d5c0f6f2a11")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

/// Confirmation body returned by `DELETE` endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    #[schema(example = "Account 'acme' deleted")]
    pub message: String,
}

impl MessageResponse {
    /// Wrap a confirmation message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// OpenAPI schema for [`crate::domain::Account`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Account, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct AccountSchema {
    /// Store-assigned identifier.
    #[schema(example = "665f1c2b9d3e4a0012345678")]
    id: String,
    /// Unique lowercase key.
    #[schema(example = "acme-corp")]
    slug: String,
    /// Owning user's identifier.
    user_id: String,
    #[schema(example = "Acme Corp")]
    name: String,
    description: Option<String>,
    /// Positive score.
    score: Option<f64>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::CreateAccountInput`].
#[derive(ToSchema)]
#[schema(as = crate::domain::CreateAccountInput, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct CreateAccountSchema {
    /// Must name an existing user.
    user_id: String,
    /// Unique, non-blank account key.
    #[schema(example = "acme-corp")]
    slug: String,
    name: String,
    description: Option<String>,
    score: Option<f64>,
}

/// OpenAPI schema for [`crate::domain::AccountPatch`].
#[derive(ToSchema)]
#[schema(as = crate::domain::AccountPatch, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct AccountPatchSchema {
    /// Identifies the account to update.
    slug: String,
    name: Option<String>,
    /// `null` clears the stored description; omit the field to keep it.
    description: Option<String>,
    score: Option<f64>,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = crate::domain::User, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    /// Store-assigned identifier.
    #[schema(example = "665f1c2b9d3e4a0012345678")]
    id: String,
    #[schema(example = "ada@example.com")]
    email: String,
    #[schema(example = "Ada")]
    first_name: String,
    #[schema(example = "Lovelace")]
    last_name: String,
    phone_number: Option<String>,
    is_active: bool,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::CreateUserInput`].
#[derive(ToSchema)]
#[schema(as = crate::domain::CreateUserInput, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct CreateUserSchema {
    email: String,
    first_name: String,
    last_name: String,
    phone_number: Option<String>,
    /// Defaults to `true`.
    is_active: Option<bool>,
}

/// OpenAPI schema for [`crate::domain::UserPatch`].
#[derive(ToSchema)]
#[schema(as = crate::domain::UserPatch, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserPatchSchema {
    /// Identifies the user to update.
    id: String,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    phone_number: Option<String>,
    is_active: Option<bool>,
}

/// OpenAPI schema for [`crate::domain::StatisticsEvent`].
#[derive(ToSchema)]
#[schema(as = crate::domain::StatisticsEvent, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct StatisticsEventSchema {
    id: String,
    #[schema(example = "account_created")]
    event_type: String,
    entity_id: String,
    entity_slug: String,
    user_id: String,
    /// Opaque event payload.
    metadata: serde_json::Value,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::NewStatisticsEvent`].
#[derive(ToSchema)]
#[schema(as = crate::domain::NewStatisticsEvent, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct NewStatisticsEventSchema {
    #[schema(example = "account_created")]
    event_type: String,
    entity_id: String,
    entity_slug: String,
    user_id: String,
    /// Defaults to `{}`.
    metadata: Option<serde_json::Value>,
}

/// Page envelope fields shared by every listing response.
macro_rules! page_schema {
    ($name:ident, $alias:ident, $item:ty) => {
        /// OpenAPI schema for one page of records.
        #[derive(ToSchema)]
        #[schema(as = $alias, rename_all = "camelCase")]
        #[expect(
            dead_code,
            reason = "Used only for OpenAPI schema generation via utoipa"
        )]
        pub struct $name {
            items: Vec<$item>,
            page: u32,
            page_size: u32,
            total_items: u64,
            total_pages: u64,
            sort_field: String,
            #[schema(example = "desc")]
            sort_order: String,
        }
    };
}

page_schema!(AccountPageSchema, AccountPage, AccountSchema);
page_schema!(UserPageSchema, UserPage, UserSchema);
page_schema!(StatisticsPageSchema, StatisticsPage, StatisticsEventSchema);
