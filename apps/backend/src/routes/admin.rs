//! Administrative routes. Every resource here sits behind `AuthGate::admin()`.

use actix_web::{web, HttpResponse};
use serde::Serialize;
use tracing::info;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::current_user::AdminUser;
use crate::logging::pii::Redacted;
use crate::logging::security;
use crate::middleware::auth_gate::AuthGate;
use crate::repos::{NewUser, SignupSummary};
use crate::routes::{body_value, plain_text};
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct SignupRequestList {
    #[serde(rename = "Requests")]
    requests: Vec<SignupSummary>,
}

async fn list_users(_admin: AdminUser, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(app_state.store.list_users().await?))
}

async fn list_signup_requests(
    _admin: AdminUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let requests = app_state.store.list_signup_requests().await?;
    Ok(HttpResponse::Ok().json(SignupRequestList { requests }))
}

fn no_signup_request() -> AppError {
    AppError::not_found(ErrorCode::SignupRequestNotFound, "No signup request for that email")
}

/// Turn a pending signup into an account seeded with the default preamble.
async fn accept_signup_request(
    admin: AdminUser,
    body: web::Bytes,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let email = body_value(&body, "email")?;
    let request = app_state
        .store
        .take_signup_request(email)
        .await?
        .ok_or_else(no_signup_request)?;

    let prompt = app_state.default_prompt.current();
    let user = app_state
        .store
        .create_user(NewUser::from_signup(request), &prompt)
        .await?;
    info!(admin_id = admin.identity, user_id = user.id, email = %Redacted(email), "signup request accepted");

    Ok(HttpResponse::Ok().finish())
}

async fn reject_signup_request(
    admin: AdminUser,
    body: web::Bytes,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let email = body_value(&body, "email")?;
    app_state
        .store
        .take_signup_request(email)
        .await?
        .ok_or_else(no_signup_request)?;
    info!(admin_id = admin.identity, email = %Redacted(email), "signup request rejected");

    Ok(HttpResponse::Ok().finish())
}

async fn promote_user(
    admin: AdminUser,
    body: web::Bytes,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let email = body_value(&body, "email")?;
    if !app_state.store.promote_user(email).await? {
        return Err(AppError::not_found(ErrorCode::UserNotFound, "No user with that email"));
    }
    security::admin_setting_changed("promote_user", admin.identity);

    Ok(HttpResponse::Ok().finish())
}

/// Local delete first, then the pipeline's copy; its answer is relayed as is.
async fn delete_user(
    admin: AdminUser,
    body: web::Bytes,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let email = body_value(&body, "email")?;
    let removed = app_state
        .store
        .delete_user(email)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::UserNotFound, "No user with that email"))?;
    info!(admin_id = admin.identity, user_id = removed.id, "user deleted locally");

    Ok(app_state
        .gateway
        .delete_user(removed.id)
        .await?
        .into_http_response())
}

async fn list_models(_admin: AdminUser, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(app_state.gateway.list_models().await?.into_http_response())
}

async fn current_model(_admin: AdminUser, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(plain_text(app_state.models.current()))
}

async fn select_model(
    admin: AdminUser,
    body: web::Bytes,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let model = body_value(&body, "model name")?;
    let previous = app_state.models.select(model);
    info!(admin_id = admin.identity, previous = %previous, current = %model, "model selection changed");
    security::admin_setting_changed("model_selection", admin.identity);

    Ok(HttpResponse::Ok().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/get/users")
            .wrap(AuthGate::admin())
            .route(web::get().to(list_users)),
    )
    .service(
        web::resource("/api/get/signup_request")
            .wrap(AuthGate::admin())
            .route(web::get().to(list_signup_requests)),
    )
    .service(
        web::resource("/api/update/signup_request")
            .wrap(AuthGate::admin())
            .route(web::put().to(accept_signup_request)),
    )
    .service(
        web::resource("/api/delete/signup_request")
            .wrap(AuthGate::admin())
            .route(web::delete().to(reject_signup_request)),
    )
    .service(
        web::resource("/api/update/promote_user")
            .wrap(AuthGate::admin())
            .route(web::put().to(promote_user)),
    )
    .service(
        web::resource("/api/delete/user")
            .wrap(AuthGate::admin())
            .route(web::delete().to(delete_user)),
    )
    .service(
        web::resource("/api/get/models")
            .wrap(AuthGate::admin())
            .route(web::get().to(list_models)),
    )
    .service(
        web::resource("/api/get/current_model")
            .wrap(AuthGate::admin())
            .route(web::get().to(current_model)),
    )
    .service(
        web::resource("/api/update/model_selection")
            .wrap(AuthGate::admin())
            .route(web::put().to(select_model)),
    );
}
