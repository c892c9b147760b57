//! Authorization gate for protected scopes.
//!
//! `AuthGate::standard()` admits any valid session token, `AuthGate::admin()`
//! only tokens with the admin flag. On success the [`AuthorizationResult`] is
//! put into request extensions for the `CurrentUser`/`AdminUser` extractors.
//! Denials are rendered here as Problem Details.

use std::rc::Rc;
use std::time::SystemTime;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderValue};
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::{authorize, authorize_admin, AdminOutcome, AuthorizationResult};
use crate::error::AppError;
use crate::logging::security;
use crate::state::app_state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capability {
    Authenticated,
    Admin,
}

#[derive(Debug, Clone, Copy)]
pub struct AuthGate {
    capability: Capability,
}

impl AuthGate {
    /// Any authenticated identity.
    pub fn standard() -> Self {
        Self {
            capability: Capability::Authenticated,
        }
    }

    /// Authenticated identity with administrative privilege.
    pub fn admin() -> Self {
        Self {
            capability: Capability::Admin,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGateMiddleware {
            service: Rc::new(service),
            capability: self.capability,
        }))
    }
}

pub struct AuthGateMiddleware<S> {
    service: Rc<S>,
    capability: Capability,
}

impl<S, B> Service<ServiceRequest> for AuthGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let capability = self.capability;

        // Evaluated inside the future so the denial is rendered within the
        // request's trace scope.
        Box::pin(async move {
            match check(&req, capability) {
                Ok(result) => {
                    req.extensions_mut().insert(result);
                    service.call(req).await.map(ServiceResponse::map_into_left_body)
                }
                Err(err) => Ok(req.error_response(err).map_into_right_body()),
            }
        })
    }
}

fn check(req: &ServiceRequest, capability: Capability) -> Result<AuthorizationResult, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::internal("AppState not available"))?;

    let token = extract_token(req.headers().get(header::AUTHORIZATION))?;
    let now = SystemTime::now();

    match capability {
        Capability::Authenticated => authorize(token, now, &state.security).map_err(|reason| {
            security::token_rejected(&reason.to_string(), req.path());
            AppError::from(reason)
        }),
        Capability::Admin => match authorize_admin(token, now, &state.security) {
            AdminOutcome::Elevated(result) => Ok(result),
            AdminOutcome::Anonymous => {
                security::elevated_denied(req.path());
                Err(AppError::unauthorized())
            }
        },
    }
}

/// The token is the bare header value; a `Bearer ` prefix is tolerated.
pub(crate) fn extract_token(value: Option<&HeaderValue>) -> Result<&str, AppError> {
    let raw = value
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .ok_or_else(AppError::missing_authorization)?;

    let token = match raw.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ if raw.eq_ignore_ascii_case("bearer") => "",
        _ => raw,
    };

    if token.is_empty() {
        return Err(AppError::missing_authorization());
    }
    Ok(token)
}
