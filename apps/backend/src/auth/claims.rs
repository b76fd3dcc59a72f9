//! Session token payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::roles::Role;

/// Claims as written into an issued token.
#[derive(Debug, Serialize, Clone)]
pub struct Claims {
    /// `users.user_id` of the subject
    pub sub: String,
    pub role: Role,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

/// Claims as read back from a presented token. Subject and role are
/// optional here so their absence is reported distinctly.
#[derive(Debug, Deserialize)]
pub(crate) struct PresentedClaims {
    #[serde(default, alias = "user_id")]
    pub sub: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub iat: Option<i64>,
    pub exp: i64,
}

/// A token that passed signature, expiry and claim checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject_id: String,
    pub role: Role,
    pub issued_at: Option<i64>,
    pub expires_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    Subject,
    Role,
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Claim::Subject => f.write_str("sub"),
            Claim::Role => f.write_str("role"),
        }
    }
}
