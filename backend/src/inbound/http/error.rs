//! Rendering of domain errors as HTTP responses.
//!
//! Handlers return [`ApiResult`]; actix calls [`ResponseError`] on the
//! domain [`Error`] to pick the status and serialise the payload. Extractor
//! rejections (malformed JSON bodies or query strings) are funnelled into
//! the same payload shape by the handlers registered in the app builder.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";

/// Payload sent to the client. Internal failures keep only their code and
/// trace id so store or driver messages never leave the process.
fn public_payload(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    error!(error = %error, trace_id = ?error.trace_id(), "request failed");
    let redacted = Error::internal(REDACTED_MESSAGE);
    match error.trace_id() {
        Some(id) => redacted.with_trace_id(id.to_owned()),
        None => redacted,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let payload = public_payload(self);
        let mut response = HttpResponse::build(self.status_code());
        if let Some(id) = payload.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        response.json(payload)
    }
}

fn rejected_input(message: &str, code: &str, reason: impl std::fmt::Display) -> actix_web::Error {
    Error::invalid_request(message)
        .with_details(json!({ "code": code, "reason": reason.to_string() }))
        .into()
}

/// `JsonConfig` error handler answering malformed bodies with
/// `invalid_request`.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    rejected_input(
        "request body is not valid JSON for this endpoint",
        "invalid_body",
        err,
    )
}

/// `QueryConfig` error handler answering malformed query strings with
/// `invalid_request`.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    rejected_input("query string is invalid for this endpoint", "invalid_query", err)
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
