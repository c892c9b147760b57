//! Error codes for the gateway API.
//!
//! Every code that can appear in a Problem Details body is listed here.
//! Never pass ad-hoc strings as error codes.

use core::fmt;

/// Centralized error codes, each mapping to one SCREAMING_SNAKE_CASE string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Generic authorization failure; also the elevated gate's only answer
    Unauthorized,
    /// Token could not be decoded or failed its integrity check
    UnauthorizedMalformedToken,
    /// Token decoded but is past its expiration
    UnauthorizedExpiredToken,
    /// Login with unknown email or wrong password
    InvalidCredentials,

    // Request Validation
    /// Authorization header absent or unreadable
    MissingAuthorization,
    /// A required custom header (X-Filename, Title, Deep_think) is absent
    MissingHeader,
    /// Request body was not the expected JSON
    InvalidJson,
    /// General bad request error
    BadRequest,

    // Resource Not Found
    UserNotFound,
    SignupRequestNotFound,
    DocumentNotFound,

    // Conflicts
    /// Email already used by an account or a pending signup
    EmailExists,

    // Gateway
    /// A body was required for the upstream call but was empty
    EmptyPayload,
    /// The inference service could not be reached or timed out
    UpstreamUnreachable,

    // System Errors
    StoreError,
    Internal,
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMalformedToken => "UNAUTHORIZED_MALFORMED_TOKEN",
            Self::UnauthorizedExpiredToken => "UNAUTHORIZED_EXPIRED_TOKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",

            Self::MissingAuthorization => "MISSING_AUTHORIZATION",
            Self::MissingHeader => "MISSING_HEADER",
            Self::InvalidJson => "INVALID_JSON",
            Self::BadRequest => "BAD_REQUEST",

            Self::UserNotFound => "USER_NOT_FOUND",
            Self::SignupRequestNotFound => "SIGNUP_REQUEST_NOT_FOUND",
            Self::DocumentNotFound => "DOCUMENT_NOT_FOUND",

            Self::EmailExists => "EMAIL_EXISTS",

            Self::EmptyPayload => "EMPTY_PAYLOAD",
            Self::UpstreamUnreachable => "UPSTREAM_UNREACHABLE",

            Self::StoreError => "STORE_ERROR",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    /// All codes, for uniqueness checks.
    pub const ALL: &'static [ErrorCode] = &[
        Self::Unauthorized,
        Self::UnauthorizedMalformedToken,
        Self::UnauthorizedExpiredToken,
        Self::InvalidCredentials,
        Self::MissingAuthorization,
        Self::MissingHeader,
        Self::InvalidJson,
        Self::BadRequest,
        Self::UserNotFound,
        Self::SignupRequestNotFound,
        Self::DocumentNotFound,
        Self::EmailExists,
        Self::EmptyPayload,
        Self::UpstreamUnreachable,
        Self::StoreError,
        Self::Internal,
        Self::ConfigError,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
