//! Administrator management of supervisor accounts.

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
pub struct SupervisorCreateRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    /// Used as the mining site when `mining_site` is blank.
    pub department: String,
    pub mining_site: String,
    pub location: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SupervisorUpdateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mining_site: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SupervisorSummary {
    pub supervisor_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub role: String,
    pub status: &'static str,
}

impl From<User> for SupervisorSummary {
    fn from(u: User) -> Self {
        Self {
            supervisor_id: u.user_id,
            name: u.name,
            email: u.email,
            phone: u.phone,
            department: u.mining_site,
            role: u.role,
            status: "active",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SupervisorList {
    pub supervisors: Vec<SupervisorSummary>,
}

#[derive(Debug, Serialize)]
pub struct SupervisorCreated {
    pub success: bool,
    pub supervisor_id: String,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SupervisorDeleted {
    pub success: bool,
    pub message: &'static str,
}

fn supervisor_not_found() -> AppError {
    AppError::not_found(ErrorCode::SupervisorNotFound, "Supervisor not found")
}

pub async fn create_supervisor<C: ConnectionTrait>(
    conn: &C,
    security: &SecurityConfig,
    req: SupervisorCreateRequest,
) -> Result<SupervisorCreated, AppError> {
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

    let mining_site = if req.mining_site.trim().is_empty() {
        req.department
    } else {
        req.mining_site
    };
    let password_hash = hash_password(req.password, security.password_cost).await?;

    let sup = users::create_user(
        conn,
        UserCreate {
            role: Role::Supervisor,
            name: req.name.trim().to_string(),
            email,
            phone: req.phone,
            password_hash,
            mining_site,
            location: req.location,
            supervisor_id: None,
        },
    )
    .await?;

    info!(supervisor_id = %sup.user_id, "supervisor created by admin");
    Ok(SupervisorCreated {
        success: true,
        supervisor_id: sup.user_id,
        message: "Supervisor added successfully",
    })
}

pub async fn list_supervisors<C: ConnectionTrait>(conn: &C) -> Result<SupervisorList, AppError> {
    let rows = users::list_by_role(conn, Role::Supervisor).await?;
    Ok(SupervisorList {
        supervisors: rows.into_iter().map(SupervisorSummary::from).collect(),
    })
}

pub async fn get_supervisor<C: ConnectionTrait>(
    conn: &C,
    supervisor_id: &str,
) -> Result<UserView, AppError> {
    users::find_with_role(conn, supervisor_id, Role::Supervisor)
        .await?
        .map(UserView::from)
        .ok_or_else(supervisor_not_found)
}

pub async fn update_supervisor<C: ConnectionTrait>(
    conn: &C,
    supervisor_id: &str,
    req: SupervisorUpdateRequest,
) -> Result<UserView, AppError> {
    let sup = users::find_with_role(conn, supervisor_id, Role::Supervisor)
        .await?
        .ok_or_else(supervisor_not_found)?;

    let email = req
        .email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty());
    if let Some(new_email) = &email {
        if *new_email != sup.email && users::email_exists(conn, new_email).await? {
            return Err(AppError::conflict(
                ErrorCode::EmailAlreadyRegistered,
                "Email already registered",
            ));
        }
    }

    let updated = users::update_user(
        conn,
        sup,
        UserUpdate {
            name: req.name.filter(|n| !n.trim().is_empty()),
            email,
            phone: req.phone,
            mining_site: req.mining_site,
            location: req.location,
        },
    )
    .await?;
    Ok(updated.into())
}

pub async fn delete_supervisor<C: ConnectionTrait>(
    conn: &C,
    supervisor_id: &str,
) -> Result<SupervisorDeleted, AppError> {
    let sup = users::find_with_role(conn, supervisor_id, Role::Supervisor)
        .await?
        .ok_or_else(supervisor_not_found)?;

    users::delete_user(conn, sup.id).await?;
    info!(supervisor_id, "supervisor deleted by admin");
    Ok(SupervisorDeleted {
        success: true,
        message: "Supervisor deleted successfully",
    })
}
