use tracing::warn;

use super::pii::RedactedEmail;
use crate::trace_ctx;

/// Request rejected by the auth middleware. Never pass the token itself.
pub fn auth_rejected(reason: &str, path: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "auth_rejected",
        %trace_id,
        reason,
        path,
        "Authentication rejected"
    );
}

/// Authenticated caller lacked the role a route requires.
pub fn forbidden(required: &str, actual: Option<&str>, path: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "forbidden",
        %trace_id,
        required,
        actual = actual.unwrap_or("none"),
        path,
        "Role check failed"
    );
}

pub fn rate_limited(client: &str, path: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "rate_limited",
        %trace_id,
        client,
        path,
        "Rate limit exceeded"
    );
}

pub fn login_failed(reason: &str, email: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "login_failed",
        %trace_id,
        email = %RedactedEmail(email),
        reason,
        "Login failed"
    );
}
