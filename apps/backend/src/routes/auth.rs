use std::time::SystemTime;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::issue_session_token;
use crate::error::AppError;
use crate::logging::security;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "Email")]
    pub email: String,
    #[serde(alias = "Password")]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(rename = "IsAdmin")]
    pub is_admin: bool,
    #[serde(rename = "IsPremium")]
    pub is_premium: bool,
    #[serde(rename = "JWTToken")]
    pub token: String,
    #[serde(rename = "Username")]
    pub username: String,
}

/// Compare without an early exit on the first differing byte.
fn passwords_match(stored: &str, given: &str) -> bool {
    blake3::hash(stored.as_bytes()) == blake3::hash(given.as_bytes())
}

/// Exchange email and password for a session token.
async fn login(body: web::Bytes, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let credentials: LoginRequest =
        serde_json::from_slice(&body).map_err(|e| AppError::invalid_json(e.to_string()))?;

    let user = match app_state.store.find_user_by_email(&credentials.email).await? {
        Some(user) if passwords_match(&user.password, &credentials.password) => user,
        Some(_) => {
            security::login_failed("wrong_password", &credentials.email);
            return Err(AppError::invalid_credentials());
        }
        None => {
            security::login_failed("unknown_email", &credentials.email);
            return Err(AppError::invalid_credentials());
        }
    };

    let token = issue_session_token(user.id, user.is_admin, SystemTime::now(), &app_state.security)?;
    info!(user_id = user.id, is_admin = user.is_admin, "login succeeded");

    Ok(HttpResponse::Ok().json(LoginResponse {
        is_admin: user.is_admin,
        is_premium: user.is_premium,
        token,
        username: user.name,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/login").route(web::post().to(login)));
}
