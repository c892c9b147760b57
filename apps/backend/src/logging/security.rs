//! Security events. Each carries an `event` field for alerting.

use tracing::{info, warn};

use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// Login rejected for an unknown email or a wrong password.
pub fn login_failed(reason: &str, email: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_LOGIN_FAILED",
        %trace_id,
        email = %Redacted(email),
        reason,
        "Authentication failure"
    );
}

/// Session token rejected by the standard gate.
pub fn token_rejected(reason: &str, path: &str) {
    let trace_id = trace_ctx::trace_id();

    info!(
        event = "SECURITY_TOKEN_REJECTED",
        %trace_id,
        reason,
        path,
        "Session token rejected"
    );
}

/// Elevated gate denied. No reason is recorded here; the verifier logs it at debug.
pub fn elevated_denied(path: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_ELEVATED_DENIED",
        %trace_id,
        path,
        "Administrator check failed"
    );
}

/// An administrator changed process-wide inference settings.
pub fn admin_setting_changed(setting: &str, admin_id: i64) {
    let trace_id = trace_ctx::trace_id();

    info!(
        event = "ADMIN_SETTING_CHANGED",
        %trace_id,
        setting,
        admin_id,
        "Administrative setting changed"
    );
}
