use std::future::{ready, Ready};
use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};

use crate::auth::AuthorizationResult;
use crate::error::AppError;

/// Caller admitted by `AuthGate::standard()` (or the admin gate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub AuthorizationResult);

/// Caller admitted by `AuthGate::admin()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminUser(pub AuthorizationResult);

fn gate_result(req: &HttpRequest) -> Option<AuthorizationResult> {
    req.extensions().get::<AuthorizationResult>().copied()
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            gate_result(req)
                .filter(|r| !r.is_anonymous())
                .map(CurrentUser)
                .ok_or_else(AppError::unauthorized),
        )
    }
}

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            gate_result(req)
                .filter(|r| r.is_admin)
                .map(AdminUser)
                .ok_or_else(AppError::unauthorized),
        )
    }
}

impl Deref for CurrentUser {
    type Target = AuthorizationResult;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Deref for AdminUser {
    type Target = AuthorizationResult;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;
    use crate::errors::ErrorCode;

    #[actix_web::test]
    async fn without_gate_result_is_unauthorized() {
        let (req, mut payload) = TestRequest::default().to_http_parts();
        let err = CurrentUser::from_request(&req, &mut payload).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[actix_web::test]
    async fn admin_requires_flag() {
        let (req, mut payload) = TestRequest::default().to_http_parts();
        req.extensions_mut().insert(AuthorizationResult {
            identity: 3,
            is_admin: false,
        });

        let user = CurrentUser::from_request(&req, &mut payload).await.unwrap();
        assert_eq!(user.identity, 3);
        assert!(AdminUser::from_request(&req, &mut payload).await.is_err());
    }
}
