//! Claims carried inside a session token and the per-request result derived from them.

use serde::{Deserialize, Serialize};

/// Facts encoded inside a session token.
///
/// Field names on the wire are `ExpirationTime`, `ID` and `IsAdmin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Expiry (seconds since epoch)
    #[serde(rename = "ExpirationTime")]
    pub expiration: i64,
    /// Account id (users.id)
    #[serde(rename = "ID")]
    pub identity: i64,
    #[serde(rename = "IsAdmin")]
    pub is_admin: bool,
}

/// Who is calling, as established by the authorization gate for one request.
///
/// Inserted into request extensions by `AuthGate`; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationResult {
    pub identity: i64,
    pub is_admin: bool,
}

impl AuthorizationResult {
    /// Result handed out when the elevated check denies.
    pub const ANONYMOUS: AuthorizationResult = AuthorizationResult {
        identity: 0,
        is_admin: false,
    };

    pub fn is_anonymous(&self) -> bool {
        *self == Self::ANONYMOUS
    }
}

impl From<&Claims> for AuthorizationResult {
    fn from(claims: &Claims) -> Self {
        Self {
            identity: claims.identity,
            is_admin: claims.is_admin,
        }
    }
}
