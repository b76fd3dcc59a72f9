//! Signup and the two login flows (dashboard and mobile app).

use std::time::SystemTime;

use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{issue_token, Role};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::pii::RedactedEmail;
use crate::logging::security;
use crate::repos::users::{self, User, UserCreate};
use crate::services::users::UserView;
use crate::state::SecurityConfig;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub mining_site: String,
    pub location: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppLoginRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: String,
    pub role: String,
    pub user: UserView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supervisor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AppLoginResponse {
    pub token: String,
    pub miner_id: String,
    pub miner_name: String,
    pub phone_number: String,
    pub supervisor_name: String,
    pub location: String,
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn stored_role(user: &User) -> Result<Role, AppError> {
    user.role
        .parse::<Role>()
        .map_err(|e| AppError::internal(format!("user {} has {e}", user.user_id)))
}

fn auth_response(
    user: User,
    role: Role,
    token: String,
    supervisor_name: Option<String>,
) -> AuthResponse {
    let organization_id = non_empty(&user.mining_site);
    AuthResponse {
        token,
        user_id: user.user_id.clone(),
        role: role.as_str().to_string(),
        user: UserView::from(user),
        supervisor_name,
        organization_id,
    }
}

/// Register a supervisor account and sign it in.
pub async fn signup<C: ConnectionTrait>(
    conn: &C,
    security: &SecurityConfig,
    req: SignupRequest,
) -> Result<AuthResponse, AppError> {
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

    let password_hash = hash_password(req.password, security.password_cost).await?;
    let user = users::create_user(
        conn,
        UserCreate {
            role: Role::Supervisor,
            name: req.name.trim().to_string(),
            email,
            phone: req.phone,
            password_hash,
            mining_site: req.mining_site,
            location: req.location,
            supervisor_id: None,
        },
    )
    .await?;

    info!(user_id = %user.user_id, email = %RedactedEmail(&user.email), "supervisor registered");

    let token = issue_token(&user.user_id, Role::Supervisor, SystemTime::now(), security)?;
    Ok(auth_response(user, Role::Supervisor, token, None))
}

/// Email and password check shared by both login flows.
async fn authenticate<C: ConnectionTrait>(
    conn: &C,
    email: &str,
    password: String,
) -> Result<User, AppError> {
    let Some(user) = users::find_by_email(conn, email).await? else {
        security::login_failed("unknown_email", email);
        return Err(AppError::unauthorized(
            ErrorCode::InvalidCredentials,
            INVALID_CREDENTIALS,
        ));
    };

    if !verify_password(password, user.password.clone()).await? {
        security::login_failed("bad_password", email);
        return Err(AppError::unauthorized(
            ErrorCode::InvalidCredentials,
            INVALID_CREDENTIALS,
        ));
    }

    Ok(user)
}

async fn supervisor_name_of<C: ConnectionTrait>(
    conn: &C,
    user: &User,
) -> Result<Option<String>, AppError> {
    match &user.supervisor_id {
        Some(id) => Ok(users::find_by_user_id(conn, id).await?.map(|s| s.name)),
        None => Ok(None),
    }
}

/// Dashboard login for any role.
pub async fn login<C: ConnectionTrait>(
    conn: &C,
    security: &SecurityConfig,
    req: LoginRequest,
) -> Result<AuthResponse, AppError> {
    let email = req.email.trim().to_string();
    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::invalid(
            ErrorCode::ValidationError,
            "Email and password are required",
        ));
    }

    let user = authenticate(conn, &email, req.password).await?;
    let role = stored_role(&user)?;
    let supervisor_name = match role {
        Role::Miner => supervisor_name_of(conn, &user).await?,
        _ => None,
    };

    let token = issue_token(&user.user_id, role, SystemTime::now(), security)?;
    info!(user_id = %user.user_id, role = %role, "login succeeded");
    Ok(auth_response(user, role, token, supervisor_name))
}

/// Mobile app login: the caller states the role it expects to hold.
pub async fn app_login<C: ConnectionTrait>(
    conn: &C,
    security: &SecurityConfig,
    req: AppLoginRequest,
) -> Result<AppLoginResponse, AppError> {
    let email = req.email.trim().to_string();
    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::invalid(
            ErrorCode::ValidationError,
            "Email and password are required",
        ));
    }
    let requested: Role = req
        .role
        .parse()
        .map_err(|_| AppError::invalid(ErrorCode::InvalidRole, "Invalid role specified"))?;

    let user = authenticate(conn, &email, req.password).await?;
    let role = stored_role(&user)?;
    if role != requested {
        security::login_failed("role_mismatch", &email);
        return Err(AppError::unauthorized(
            ErrorCode::InvalidCredentials,
            INVALID_CREDENTIALS,
        ));
    }

    let supervisor_name = match role {
        Role::Miner => supervisor_name_of(conn, &user).await?.ok_or_else(|| {
            AppError::conflict(
                ErrorCode::MinerNotAssigned,
                "User is not assigned to a supervisor",
            )
        })?,
        Role::Supervisor | Role::Admin => user.name.clone(),
    };

    let token = issue_token(&user.user_id, role, SystemTime::now(), security)?;
    info!(user_id = %user.user_id, role = %role, "app login succeeded");

    Ok(AppLoginResponse {
        token,
        miner_id: user.user_id,
        miner_name: user.name,
        phone_number: user.phone,
        supervisor_name,
        location: user.mining_site,
    })
}
