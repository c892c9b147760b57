//! Outermost middleware: assigns each request a trace id.
//!
//! The id is stored in request extensions as [`RequestId`], echoed in the
//! `x-request-id` response header, and made visible to `trace_ctx::trace_id()`
//! for everything polled inside the request. Handler errors are rendered
//! inside that scope, so their Problem Details carry the same id.

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use uuid::Uuid;

use crate::trace_ctx;

/// Trace id of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

pub struct RequestTrace;

impl<S, B> Transform<S, ServiceRequest> for RequestTrace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestTraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTraceMiddleware { service }))
    }
}

pub struct RequestTraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestTraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = Uuid::new_v4().to_string();
        req.extensions_mut().insert(RequestId(trace_id.clone()));

        // No request handle may outlive this call: the router needs sole ownership.
        let fut = self.service.call(req);

        Box::pin(trace_ctx::with_trace_id(trace_id.clone(), async move {
            let mut res = fut.await?;

            if let Ok(value) = HeaderValue::from_str(&trace_id) {
                res.headers_mut()
                    .insert(HeaderName::from_static("x-request-id"), value);
            }

            Ok(res)
        }))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{test, web, App, HttpRequest, HttpResponse};

    use super::*;

    async fn echo_item(req: HttpRequest, path: web::Path<String>) -> HttpResponse {
        let trace = req
            .extensions()
            .get::<RequestId>()
            .map(|r| r.0.clone())
            .unwrap_or_default();
        HttpResponse::Ok().body(format!("{}:{}", path.into_inner(), trace))
    }

    #[actix_web::test]
    async fn routed_request_gets_matching_trace_id() {
        let app = test::init_service(
            App::new()
                .wrap(RequestTrace)
                .route("/items/{id}", web::get().to(echo_item)),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/items/42").to_request()).await;
        assert_eq!(resp.status(), 200);
        let header = resp
            .headers()
            .get("x-request-id")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();

        let body = test::read_body(resp).await;
        assert_eq!(body, format!("42:{header}").as_bytes());
    }

    #[actix_web::test]
    async fn unmatched_route_still_carries_trace_id() {
        let app = test::init_service(
            App::new()
                .wrap(RequestTrace)
                .route("/items/{id}", web::get().to(echo_item)),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/nowhere").to_request()).await;
        assert_eq!(resp.status(), 404);
        assert!(resp.headers().contains_key("x-request-id"));
    }
}
