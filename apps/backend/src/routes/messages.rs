use actix_web::{web, HttpRequest, HttpResponse};

use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::headers::required_header;
use crate::gateway::ChatMessage;
use crate::middleware::auth_gate::AuthGate;
use crate::state::app_state::AppState;

async fn upload_message(
    user: CurrentUser,
    body: web::Bytes,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let upstream = app_state.gateway.upload_message(user.identity, body).await?;
    if !upstream.is_success() {
        return Ok(upstream.into_http_response());
    }
    Ok(HttpResponse::Ok().body("Success"))
}

async fn inference(
    req: HttpRequest,
    user: CurrentUser,
    body: web::Bytes,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let deep_think = required_header(&req, "deep_think")?;
    let message: ChatMessage =
        serde_json::from_slice(&body).map_err(|e| AppError::invalid_json(e.to_string()))?;

    let preamble = match app_state.store.prompt_for(user.identity).await? {
        Some(stored) if !stored.is_empty() => stored,
        _ => app_state.default_prompt.current(),
    };

    let upstream = app_state
        .gateway
        .inference(user.identity, &deep_think, message, preamble)
        .await?;
    Ok(upstream.into_http_response())
}

async fn history(user: CurrentUser, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(app_state
        .gateway
        .history(user.identity)
        .await?
        .into_http_response())
}

async fn delete_chat(
    user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let upstream = app_state.gateway.delete_chat(user.identity).await?;
    if !upstream.is_success() {
        return Ok(upstream.into_http_response());
    }
    Ok(HttpResponse::Ok().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/upload/message")
            .wrap(AuthGate::standard())
            .route(web::post().to(upload_message)),
    )
    .service(
        web::resource("/api/message/inference")
            .wrap(AuthGate::standard())
            .route(web::get().to(inference))
            .route(web::post().to(inference)),
    )
    .service(
        web::resource("/api/get/history")
            .wrap(AuthGate::standard())
            .route(web::get().to(history)),
    )
    .service(
        web::resource("/api/delete/chat")
            .wrap(AuthGate::standard())
            .route(web::delete().to(delete_chat)),
    );
}
