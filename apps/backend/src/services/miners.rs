//! Supervisor-managed miner accounts. Every lookup is scoped to the
//! calling supervisor, so a foreign miner id reads as "not found".

use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::password::hash_password;
use crate::auth::Role;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::users::{self, User, UserCreate, UserUpdate};
use crate::services::users::UserView;
use crate::state::SecurityConfig;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MinerCreateRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Accepted from older app builds in place of `phone`.
    pub phone_number: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct MinerUpdateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

fn miner_not_found() -> AppError {
    AppError::not_found(ErrorCode::MinerNotFound, "Miner not found")
}

async fn supervisor<C: ConnectionTrait>(conn: &C, supervisor_id: &str) -> Result<User, AppError> {
    users::find_with_role(conn, supervisor_id, Role::Supervisor)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::SupervisorNotFound, "Supervisor not found"))
}

pub async fn create_miner<C: ConnectionTrait>(
    conn: &C,
    security: &SecurityConfig,
    supervisor_id: &str,
    req: MinerCreateRequest,
) -> Result<UserView, AppError> {
    let email = req.email.trim().to_string();
    if req.name.trim().is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(AppError::invalid(
            ErrorCode::ValidationError,
            "Name, email, and password are required",
        ));
    }
    if users::email_exists(conn, &email).await? {
        return Err(AppError::conflict(
            ErrorCode::EmailAlreadyRegistered,
            "Email already registered",
        ));
    }

    let sup = supervisor(conn, supervisor_id).await?;
    let phone = if req.phone.trim().is_empty() {
        req.phone_number
    } else {
        req.phone
    };
    let password_hash = hash_password(req.password, security.password_cost).await?;

    let miner = users::create_user(
        conn,
        UserCreate {
            role: Role::Miner,
            name: req.name.trim().to_string(),
            email,
            phone,
            password_hash,
            mining_site: sup.mining_site,
            location: sup.location,
            supervisor_id: Some(sup.user_id),
        },
    )
    .await?;

    info!(miner_id = %miner.user_id, supervisor_id, "miner created");
    Ok(miner.into())
}

pub async fn list_miners<C: ConnectionTrait>(
    conn: &C,
    supervisor_id: &str,
) -> Result<Vec<UserView>, AppError> {
    let miners = users::list_miners(conn, supervisor_id).await?;
    Ok(miners.into_iter().map(UserView::from).collect())
}

pub async fn get_miner<C: ConnectionTrait>(
    conn: &C,
    supervisor_id: &str,
    miner_id: &str,
) -> Result<UserView, AppError> {
    users::find_miner(conn, supervisor_id, miner_id)
        .await?
        .map(UserView::from)
        .ok_or_else(miner_not_found)
}

pub async fn update_miner<C: ConnectionTrait>(
    conn: &C,
    supervisor_id: &str,
    miner_id: &str,
    req: MinerUpdateRequest,
) -> Result<UserView, AppError> {
    let miner = users::find_miner(conn, supervisor_id, miner_id)
        .await?
        .ok_or_else(miner_not_found)?;

    let email = req
        .email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty());
    if let Some(new_email) = &email {
        if *new_email != miner.email && users::email_exists(conn, new_email).await? {
            return Err(AppError::conflict(
                ErrorCode::EmailAlreadyRegistered,
                "Email already registered",
            ));
        }
    }

    let updated = users::update_user(
        conn,
        miner,
        UserUpdate {
            name: req.name.filter(|n| !n.trim().is_empty()),
            email,
            phone: req.phone,
            ..Default::default()
        },
    )
    .await?;
    Ok(updated.into())
}

pub async fn delete_miner<C: ConnectionTrait>(
    conn: &C,
    supervisor_id: &str,
    miner_id: &str,
) -> Result<Message, AppError> {
    let miner = users::find_miner(conn, supervisor_id, miner_id)
        .await?
        .ok_or_else(miner_not_found)?;

    users::delete_user(conn, miner.id).await?;
    info!(miner_id, supervisor_id, "miner deleted");
    Ok(Message {
        message: "Miner deleted successfully",
    })
}
