//! Session token helpers for tests

use std::time::{Duration, SystemTime};

use inference_gateway::auth::issue_session_token;
use inference_gateway::repos::UserRecord;
use inference_gateway::state::security_config::SecurityConfig;

/// Token for `user` issued now.
pub fn token_for(user: &UserRecord, sec: &SecurityConfig) -> String {
    issue_session_token(user.id, user.is_admin, SystemTime::now(), sec)
        .expect("should issue token successfully")
}

/// Full Authorization header value including the "Bearer " prefix
pub fn bearer_header(user: &UserRecord, sec: &SecurityConfig) -> String {
    format!("Bearer {}", token_for(user, sec))
}

/// Token whose expiration lies well in the past
pub fn expired_token(user: &UserRecord, sec: &SecurityConfig) -> String {
    let issued = SystemTime::now()
        .checked_sub(sec.session_ttl + Duration::from_secs(60))
        .unwrap();
    issue_session_token(user.id, user.is_admin, issued, sec).expect("should issue expired token")
}
