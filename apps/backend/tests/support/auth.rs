//! Token helpers for tests.

use std::time::{Duration, SystemTime};

use minesafe_backend::auth::{issue_token, Role, TOKEN_TTL};
use minesafe_backend::state::security_config::SecurityConfig;

/// Test secret with the cheapest bcrypt cost so fixtures hash quickly.
pub fn test_security() -> SecurityConfig {
    SecurityConfig::new(b"minesafe_test_secret_key".to_vec()).with_password_cost(4)
}

/// `Bearer <token>` for `subject_id` with `role`, issued now.
pub fn bearer_for(subject_id: &str, role: Role) -> String {
    let token = issue_token(subject_id, role, SystemTime::now(), &test_security())
        .expect("should mint token successfully");
    format!("Bearer {token}")
}

/// A token whose expiry passed a minute ago.
pub fn expired_bearer_for(subject_id: &str, role: Role) -> String {
    let issued = SystemTime::now() - TOKEN_TTL - Duration::from_secs(60);
    let token = issue_token(subject_id, role, issued, &test_security())
        .expect("should mint token successfully");
    format!("Bearer {token}")
}
