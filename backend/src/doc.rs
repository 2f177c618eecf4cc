//! OpenAPI documentation configuration.
//!
//! One document per service. Each registers:
//!
//! - **Paths**: the service's resource endpoints and the health probes
//! - **Schemas**: wrappers from [`crate::inbound::http::schemas`] that
//!   describe domain types without coupling them to utoipa
//!
//! The documents are served by Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::inbound::http::schemas::{
    AccountPageSchema, AccountPatchSchema, AccountSchema, CreateAccountSchema,
    CreateUserSchema, ErrorCodeSchema, ErrorSchema, MessageResponse, NewStatisticsEventSchema,
    StatisticsEventSchema, StatisticsPageSchema, UserPageSchema, UserPatchSchema, UserSchema,
};

/// OpenAPI document for the account service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Account service API",
        description = "CRUD access to accounts owned by registered users."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::accounts::list_accounts,
        crate::inbound::http::accounts::get_account,
        crate::inbound::http::accounts::create_account,
        crate::inbound::http::accounts::update_account,
        crate::inbound::http::accounts::delete_account,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        AccountSchema,
        CreateAccountSchema,
        AccountPatchSchema,
        AccountPageSchema,
        MessageResponse,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "accounts", description = "Operations on accounts"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct AccountApiDoc;

/// OpenAPI document for the user service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User service API",
        description = "User registration, profile updates and activation."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::users::activate_user,
        crate::inbound::http::users::deactivate_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserSchema,
        CreateUserSchema,
        UserPatchSchema,
        UserPageSchema,
        MessageResponse,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "users", description = "Operations on users"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct UserApiDoc;

/// OpenAPI document for the statistics service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Statistics service API",
        description = "Append-only event log fed by the account and user services."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::statistics::list_statistics,
        crate::inbound::http::statistics::list_by_event_type,
        crate::inbound::http::statistics::list_by_user,
        crate::inbound::http::statistics::event_counts,
        crate::inbound::http::statistics::record_event,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        StatisticsEventSchema,
        NewStatisticsEventSchema,
        StatisticsPageSchema,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "statistics", description = "Recording and querying events"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct StatisticsApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying each document lists its own endpoints.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case(AccountApiDoc::openapi(), &["/accounts", "/accounts/{slug}"])]
    #[case(UserApiDoc::openapi(), &["/users", "/users/{id}", "/users/{id}/activate"])]
    #[case(
        StatisticsApiDoc::openapi(),
        &["/statistics", "/statistics/counts", "/statistics/user/{userId}"]
    )]
    fn documents_list_resource_and_health_paths(
        #[case] doc: utoipa::openapi::OpenApi,
        #[case] expected: &[&str],
    ) {
        for path in expected.iter().chain(&["/health/ready", "/health/live"]) {
            assert!(doc.paths.paths.contains_key(*path), "missing path {path}");
        }
    }

    #[rstest]
    fn error_schema_exposes_code_message_and_trace_id() {
        let doc = AccountApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
        assert_object_schema_has_field(error_schema, "traceId");
    }

    #[rstest]
    fn account_document_does_not_leak_user_paths() {
        let doc = AccountApiDoc::openapi();
        assert!(!doc.paths.paths.contains_key("/users"));
    }
}
