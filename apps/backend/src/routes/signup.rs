use actix_web::{web, HttpResponse};
use tracing::info;

use crate::error::AppError;
use crate::logging::pii::Redacted;
use crate::repos::SignupRequest;
use crate::state::app_state::AppState;

/// Queue a signup for admin review. 409 if the email is taken.
async fn signup(body: web::Bytes, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let request: SignupRequest =
        serde_json::from_slice(&body).map_err(|e| AppError::invalid_json(e.to_string()))?;

    if request.email.trim().is_empty() {
        return Err(AppError::invalid_json("Email must not be empty"));
    }

    let email = request.email.clone();
    app_state.store.add_signup_request(request).await?;
    info!(email = %Redacted(&email), "signup request queued");

    Ok(HttpResponse::Ok().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/post/signup").route(web::post().to(signup)));
}
