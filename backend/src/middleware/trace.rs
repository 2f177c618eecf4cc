//! Tracing middleware attaching a request-scoped trace identifier.
//!
//! A request that arrives with a well-formed `trace-id` header keeps that
//! identifier, so a call fanned out from one service to another logs under
//! the same id. Otherwise a fresh UUID is generated. The identifier is held
//! in task-local storage for the lifetime of the request and echoed back in
//! the response header.

use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::error;

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Tracing middleware attaching a request-scoped UUID and
/// adding a `trace-id` header to every response.
///
/// Handlers can read the trace ID via [`TraceId::current`].
///
/// # Examples
/// ```
/// use actix_web::App;
/// use account_platform::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Clone)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service wrapper produced by [`Trace`].
///
/// Applications should not use this type directly.
pub struct TraceMiddleware<S> {
    service: S,
}

/// Trace id supplied by the caller, if it parses as a UUID.
fn inbound_trace_id(req: &ServiceRequest) -> Option<TraceId> {
    req.headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = inbound_trace_id(&req).unwrap_or_else(TraceId::generate);
        let header_value = trace_id.to_string();
        let fut = self.service.call(req);
        Box::pin(TraceId::scope(trace_id, async move {
            let mut res = fut.await?;
            match HeaderValue::from_str(&header_value) {
                Ok(value) => {
                    res.response_mut()
                        .headers_mut()
                        .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                }
                Err(error) => {
                    error!(
                        %error,
                        trace_id = %trace_id,
                        "failed to encode trace identifier header"
                    );
                }
            }
            Ok(res)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    async fn call_with<F, Fut, Res>(
        handler: F,
        request: test::TestRequest,
    ) -> (
        actix_web::dev::ServiceResponse<actix_web::body::BoxBody>,
        String,
    )
    where
        F: Fn() -> Fut + Clone + 'static,
        Fut: std::future::Future<Output = Res> + 'static,
        Res: actix_web::Responder + 'static,
    {
        let app =
            test::init_service(App::new().wrap(Trace).route("/", web::get().to(handler))).await;
        let res = test::call_service(&app, request.uri("/").to_request()).await;
        let trace_id = res
            .headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("header is ascii")
            .to_owned();
        (res, trace_id)
    }

    async fn echo_trace_id() -> HttpResponse {
        let id = TraceId::current().expect("trace id in scope");
        HttpResponse::Ok().body(id.to_string())
    }

    #[actix_web::test]
    async fn exposes_generated_trace_id_in_handler() {
        let (res, trace_id) = call_with(echo_trace_id, test::TestRequest::get()).await;
        let body = test::read_body(res).await;
        let body = std::str::from_utf8(&body).expect("utf8 body");
        assert_eq!(trace_id, body);
        assert!(trace_id.parse::<TraceId>().is_ok());
    }

    #[actix_web::test]
    async fn keeps_a_well_formed_inbound_trace_id() {
        let inbound = "6f1c1e58-3b9a-4a8e-9a65-0d5c0f6f2a11";
        let (res, trace_id) = call_with(
            echo_trace_id,
            test::TestRequest::get().insert_header((TRACE_ID_HEADER, inbound)),
        )
        .await;
        let body = test::read_body(res).await;
        assert_eq!(trace_id, inbound);
        assert_eq!(body.as_ref(), inbound.as_bytes());
    }

    #[rstest]
    #[case("not-a-uuid")]
    #[case("")]
    #[actix_web::test]
    async fn replaces_malformed_inbound_trace_ids(#[case] inbound: &str) {
        let (_, trace_id) = call_with(
            echo_trace_id,
            test::TestRequest::get().insert_header((TRACE_ID_HEADER, inbound)),
        )
        .await;
        assert_ne!(trace_id, inbound);
        assert!(trace_id.parse::<TraceId>().is_ok());
    }

    #[actix_web::test]
    async fn propagates_trace_id_in_error() {
        use crate::domain::Error as DomainError;
        use crate::inbound::http::ApiResult;

        let (res, trace_id) = call_with(
            || async move { ApiResult::<HttpResponse>::Err(DomainError::not_found("missing")) },
            test::TestRequest::get(),
        )
        .await;
        let body: DomainError = test::read_body_json(res).await;
        assert_eq!(body.trace_id(), Some(trace_id.as_str()));
    }
}
