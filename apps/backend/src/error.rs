use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;
use crate::errors::ErrorCode;
use crate::gateway::GatewayError;
use crate::repos::StoreError;
use crate::trace_ctx;

/// RFC 7807 body for every error response.
#[derive(Debug, Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Unauthorized: {detail}")]
    Unauthorized { code: ErrorCode, detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("Empty payload")]
    EmptyPayload,
    #[error("Upstream unreachable: {detail}")]
    UpstreamUnreachable { detail: String },
    #[error("Store error: {detail}")]
    Store { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::BadRequest { code, .. }
            | AppError::Unauthorized { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::Conflict { code, .. } => *code,
            AppError::EmptyPayload => ErrorCode::EmptyPayload,
            AppError::UpstreamUnreachable { .. } => ErrorCode::UpstreamUnreachable,
            AppError::Store { .. } => ErrorCode::StoreError,
            AppError::Internal { .. } => ErrorCode::Internal,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            AppError::BadRequest { detail, .. }
            | AppError::Unauthorized { detail, .. }
            | AppError::NotFound { detail, .. }
            | AppError::Conflict { detail, .. }
            | AppError::UpstreamUnreachable { detail }
            | AppError::Store { detail }
            | AppError::Internal { detail }
            | AppError::Config { detail } => detail.clone(),
            AppError::EmptyPayload => "Request body must not be empty".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::UpstreamUnreachable { .. } => StatusCode::BAD_GATEWAY,
            AppError::EmptyPayload
            | AppError::Store { .. }
            | AppError::Internal { .. }
            | AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_request(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            detail: detail.into(),
        }
    }

    pub fn missing_authorization() -> Self {
        Self::bad_request(
            ErrorCode::MissingAuthorization,
            "Authorization header is required",
        )
    }

    pub fn missing_header(name: &str) -> Self {
        Self::bad_request(ErrorCode::MissingHeader, format!("{name} header is required"))
    }

    pub fn invalid_json(detail: impl Into<String>) -> Self {
        Self::bad_request(ErrorCode::InvalidJson, detail)
    }

    /// Generic denial; also the only answer of the elevated gate.
    pub fn unauthorized() -> Self {
        Self::Unauthorized {
            code: ErrorCode::Unauthorized,
            detail: "Authentication required".to_string(),
        }
    }

    pub fn invalid_credentials() -> Self {
        Self::Unauthorized {
            code: ErrorCode::InvalidCredentials,
            detail: "Username or password is wrong".to_string(),
        }
    }

    pub fn not_found(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            detail: detail.into(),
        }
    }

    pub fn conflict(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Malformed => Self::Unauthorized {
                code: ErrorCode::UnauthorizedMalformedToken,
                detail: "Session token is malformed".to_string(),
            },
            AuthError::Expired => Self::Unauthorized {
                code: ErrorCode::UnauthorizedExpiredToken,
                detail: "Session token has expired".to_string(),
            },
        }
    }
}

impl From<GatewayError> for AppError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::EmptyPayload => Self::EmptyPayload,
            GatewayError::UpstreamUnreachable(source) if source.is_timeout() => {
                Self::UpstreamUnreachable {
                    detail: "Inference service timed out".to_string(),
                }
            }
            GatewayError::UpstreamUnreachable(_) => Self::UpstreamUnreachable {
                detail: "Inference service is unreachable".to_string(),
            },
            GatewayError::InvalidHeader(name) => Self::bad_request(
                ErrorCode::BadRequest,
                format!("Value for {name} cannot be forwarded"),
            ),
            e @ (GatewayError::InvalidUrl { .. } | GatewayError::ClientSetup(_)) => {
                Self::config(e.to_string())
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(_) => Self::conflict(ErrorCode::EmailExists, "Email already exists"),
            StoreError::UnknownUser(_) => Self::not_found(ErrorCode::UserNotFound, "User not found"),
            StoreError::Unavailable(detail) => Self::Store { detail },
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code().as_str();
        let trace_id = trace_ctx::trace_id();

        if status.is_server_error() {
            tracing::error!(%trace_id, code, error = %self, "request failed");
        }

        let problem_details = ProblemDetails {
            type_: format!("https://inference-gateway.dev/errors/{code}"),
            title: Self::humanize_code(code),
            status: status.as_u16(),
            detail: self.detail(),
            code: code.to_string(),
            trace_id: trace_id.clone(),
        };

        HttpResponse::build(status)
            .content_type("application/problem+json")
            .insert_header(("x-trace-id", trace_id))
            .json(problem_details)
    }
}
