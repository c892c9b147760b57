use actix_web::web;

use crate::error::AppError;
use crate::errors::ErrorCode;

pub mod admin;
pub mod auth;
pub mod documents;
pub mod health;
pub mod messages;
pub mod prompts;
pub mod signup;

/// Register every route. Protected resources carry their own `AuthGate`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes)
        .configure(auth::configure_routes)
        .configure(signup::configure_routes)
        .configure(documents::configure_routes)
        .configure(messages::configure_routes)
        .configure(prompts::configure_routes)
        .configure(admin::configure_routes);
}

/// Raw body as text; the client sends emails, storage names and prompts this way.
pub(crate) fn body_text(body: &web::Bytes) -> Result<&str, AppError> {
    std::str::from_utf8(body)
        .map_err(|_| AppError::bad_request(ErrorCode::BadRequest, "Request body must be UTF-8 text"))
}

/// Like [`body_text`] but trimmed and non-empty.
pub(crate) fn body_value<'a>(body: &'a web::Bytes, what: &str) -> Result<&'a str, AppError> {
    let text = body_text(body)?.trim();
    if text.is_empty() {
        return Err(AppError::bad_request(
            ErrorCode::BadRequest,
            format!("Request body must contain the {what}"),
        ));
    }
    Ok(text)
}

pub(crate) fn plain_text(text: String) -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(text)
}
