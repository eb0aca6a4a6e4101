use tracing::{info, warn};

use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// Log a rejected login attempt.
pub fn login_failed(reason: &str, email: Option<&str>) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_LOGIN_FAILED",
        %trace_id,
        email = %email.map(Redacted).unwrap_or(Redacted("")),
        reason,
        "Login failure"
    );
}

/// Log a credential the session gate refused. `reason` is the internal
/// cause; the client only ever sees a generic 401.
pub fn auth_failed(reason: &str, path: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_AUTH_FAILED",
        %trace_id,
        reason,
        path,
        "Authentication failure"
    );
}

/// Log an authenticated caller hitting a role they do not hold.
pub fn access_denied(subject_id: i64, required_role: &str, path: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_FORBIDDEN",
        %trace_id,
        subject_id,
        required_role,
        path,
        "Authorization failure"
    );
}

/// Log a credential withdrawn through logout.
pub fn token_revoked(subject_id: i64) {
    let trace_id = trace_ctx::trace_id();

    info!(
        event = "SECURITY_TOKEN_REVOKED",
        %trace_id,
        subject_id,
        "Credential revoked"
    );
}
