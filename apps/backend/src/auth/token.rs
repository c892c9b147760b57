use std::time::{Duration, SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::auth::claims::{AuthorizationResult, Claims};
use crate::auth::codec;
use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Default session lifetime.
pub const FIXED_SESSION_DURATION: Duration = Duration::from_secs(7200);

/// Why the standard gate rejected a token.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("token is malformed")]
    Malformed,
    #[error("token has expired")]
    Expired,
}

/// Outcome of the elevated check. Carries no reason on denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminOutcome {
    Elevated(AuthorizationResult),
    Anonymous,
}

impl AdminOutcome {
    pub fn is_elevated(&self) -> bool {
        matches!(self, AdminOutcome::Elevated(_))
    }

    /// The authorization result, or the anonymous one when denied.
    pub fn authorization(&self) -> AuthorizationResult {
        match self {
            AdminOutcome::Elevated(result) => *result,
            AdminOutcome::Anonymous => AuthorizationResult::ANONYMOUS,
        }
    }
}

fn epoch_secs(now: SystemTime) -> Option<i64> {
    now.duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| i64::try_from(d.as_secs()).ok())
}

/// Issue a session token expiring `security.session_ttl` after `now`.
pub fn issue_session_token(
    identity: i64,
    is_admin: bool,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let issued_at = epoch_secs(now)
        .ok_or_else(|| AppError::internal("Failed to get current time".to_string()))?;
    let ttl = i64::try_from(security.session_ttl.as_secs())
        .map_err(|_| AppError::internal("Session TTL out of range".to_string()))?;

    let claims = Claims {
        expiration: issued_at.saturating_add(ttl),
        identity,
        is_admin,
    };

    codec::encode(&claims, security.mac_key())
        .map_err(|e| AppError::internal(format!("Failed to encode session token: {e}")))
}

/// Standard gate: any authenticated identity.
///
/// A token is still valid during its expiration second and expires after it.
pub fn authorize(
    token: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<AuthorizationResult, AuthError> {
    let claims = codec::decode(token, security.mac_key()).map_err(|e| {
        tracing::debug!(error = %e, "session token rejected");
        AuthError::Malformed
    })?;

    let now_secs = epoch_secs(now).unwrap_or(0);
    if claims.expiration < now_secs {
        return Err(AuthError::Expired);
    }

    Ok(AuthorizationResult::from(&claims))
}

/// Elevated gate: authenticated identity with the admin flag.
///
/// Every failure collapses into [`AdminOutcome::Anonymous`]; the real reason
/// only reaches the debug log.
pub fn authorize_admin(token: &str, now: SystemTime, security: &SecurityConfig) -> AdminOutcome {
    match authorize(token, now, security) {
        Ok(result) if result.is_admin => AdminOutcome::Elevated(result),
        Ok(result) => {
            tracing::debug!(identity = result.identity, "elevated check denied: not an admin");
            AdminOutcome::Anonymous
        }
        Err(reason) => {
            tracing::debug!(%reason, "elevated check denied");
            AdminOutcome::Anonymous
        }
    }
}
