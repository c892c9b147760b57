use actix_web::{web, HttpResponse};
use tracing::{error, info};

use crate::error::AppError;
use crate::extractors::current_user::{AdminUser, CurrentUser};
use crate::logging::security;
use crate::middleware::auth_gate::AuthGate;
use crate::routes::{body_text, plain_text};
use crate::state::app_state::AppState;

/// The caller's stored preamble, else the default one.
async fn get_prompt(user: CurrentUser, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let prompt = app_state
        .store
        .prompt_for(user.identity)
        .await?
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| app_state.default_prompt.current());
    Ok(plain_text(prompt))
}

async fn get_default_prompt(
    _user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    Ok(plain_text(app_state.default_prompt.current()))
}

async fn update_prompt(
    user: CurrentUser,
    body: web::Bytes,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let text = body_text(&body)?;
    let text = if text.trim().is_empty() {
        app_state.default_prompt.current()
    } else {
        text.to_string()
    };

    app_state.store.set_prompt(user.identity, &text).await?;
    info!(user_id = user.identity, len = text.len(), "prompt updated");
    Ok(HttpResponse::Ok().finish())
}

async fn update_default_prompt(
    admin: AdminUser,
    body: web::Bytes,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let text = body_text(&body)?;

    app_state.default_prompt.replace(text).await.map_err(|e| {
        error!(path = %app_state.default_prompt.path().display(), error = %e, "persisting default prompt failed");
        AppError::internal("Default prompt could not be saved")
    })?;
    security::admin_setting_changed("default_prompt", admin.identity);

    Ok(HttpResponse::Ok().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/get/prompt")
            .wrap(AuthGate::standard())
            .route(web::get().to(get_prompt)),
    )
    .service(
        web::resource("/api/get/default_prompt")
            .wrap(AuthGate::standard())
            .route(web::get().to(get_default_prompt)),
    )
    .service(
        web::resource("/api/update/prompt")
            .wrap(AuthGate::standard())
            .route(web::put().to(update_prompt)),
    )
    .service(
        web::resource("/api/update/default_prompt")
            .wrap(AuthGate::admin())
            .route(web::put().to(update_default_prompt)),
    );
}
