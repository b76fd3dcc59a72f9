//! bcrypt hashing, run on the blocking pool so request workers stay free.

use actix_web::web;

use crate::error::AppError;

pub async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    web::block(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::internal(format!("password hashing task failed: {e}")))?
        .map_err(AppError::from)
}

/// `false` for a wrong password and for a stored value that is not a bcrypt hash.
pub async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    let outcome = web::block(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::internal(format!("password verification task failed: {e}")))?;

    Ok(outcome.unwrap_or(false))
}
