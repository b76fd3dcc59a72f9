use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use super::claims::{Claim, Claims, PresentedClaims, VerifiedToken};
use super::roles::Role;
use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Session tokens live for seven days; there is no server-side revocation.
pub const TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature does not match")]
    BadSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is missing the {0} claim")]
    MissingClaim(Claim),
}

fn unix_secs(at: SystemTime) -> i64 {
    at.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Mint an HS256 session token for `subject_id` valid for [`TOKEN_TTL`].
pub fn issue_token(
    subject_id: &str,
    role: Role,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = unix_secs(now);
    let claims = Claims {
        sub: subject_id.to_string(),
        role,
        iat,
        exp: iat + TOKEN_TTL.as_secs() as i64,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify `token` as of `now`.
///
/// Expiry is checked here rather than by `jsonwebtoken` so that `now`
/// is authoritative (no leeway) and tests can pin the clock.
pub fn verify_token(
    token: &str,
    security: &SecurityConfig,
    now: SystemTime,
) -> Result<VerifiedToken, AuthError> {
    let mut validation = Validation::new(security.algorithm);
    validation.validate_exp = false;
    validation.set_required_spec_claims(&["exp"]);

    let data = decode::<PresentedClaims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map_err(|e| classify_decode_error(e.kind(), token))?;

    let claims = data.claims;
    if unix_secs(now) > claims.exp {
        return Err(AuthError::Expired);
    }

    let subject_id = claims
        .sub
        .filter(|s| !s.trim().is_empty())
        .ok_or(AuthError::MissingClaim(Claim::Subject))?;

    let role = claims
        .role
        .and_then(|r| r.parse::<Role>().ok())
        .ok_or(AuthError::MissingClaim(Claim::Role))?;

    Ok(VerifiedToken {
        subject_id,
        role,
        issued_at: claims.iat,
        expires_at: claims.exp,
    })
}

fn classify_decode_error(kind: &ErrorKind, token: &str) -> AuthError {
    match kind {
        ErrorKind::InvalidSignature => AuthError::BadSignature,
        // Header and payload intact: the undecodable part is the signature.
        ErrorKind::Base64(_) if header_and_payload_decode(token) => AuthError::BadSignature,
        _ => AuthError::Malformed,
    }
}

fn header_and_payload_decode(token: &str) -> bool {
    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(payload), Some(_signature), None) => {
            URL_SAFE_NO_PAD.decode(header).is_ok() && URL_SAFE_NO_PAD.decode(payload).is_ok()
        }
        _ => false,
    }
}
