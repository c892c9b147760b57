use std::fmt;
use std::time::Duration;

use crate::auth::FIXED_SESSION_DURATION;

/// Context string for deriving the token MAC key from the configured secret.
const TOKEN_KEY_CONTEXT: &str = "inference-gateway 2024-06 session token mac";

/// Session token settings, fixed for the life of the process.
#[derive(Clone)]
pub struct SecurityConfig {
    mac_key: [u8; 32],
    /// Lifetime of newly issued session tokens
    pub session_ttl: Duration,
}

impl SecurityConfig {
    /// Derive the MAC key from `secret`. Tokens issued under one secret do not
    /// verify under any other.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            mac_key: blake3::derive_key(TOKEN_KEY_CONTEXT, secret.as_ref()),
            session_ttl: FIXED_SESSION_DURATION,
        }
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn mac_key(&self) -> &[u8; 32] {
        &self.mac_key
    }
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("mac_key", &"[redacted]")
            .field("session_ttl", &self.session_ttl)
            .finish()
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"default_secret_for_tests_only_not_for_prod")
    }
}
