use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::users::{self, User};

/// Public shape of a user row. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub mining_site: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supervisor_id: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for UserView {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            user_id: u.user_id,
            name: u.name,
            email: u.email,
            phone: u.phone,
            role: u.role,
            mining_site: u.mining_site,
            location: u.location,
            supervisor_id: u.supervisor_id,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// `YYYY-MM-DD`
pub fn format_day(day: Date) -> String {
    day.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| day.to_string())
}

pub fn format_timestamp(at: OffsetDateTime) -> String {
    at.format(&Rfc3339).unwrap_or_else(|_| at.to_string())
}

pub async fn get_user<C: ConnectionTrait>(conn: &C, user_id: &str) -> Result<User, AppError> {
    users::find_by_user_id(conn, user_id)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::UserNotFound, "User not found"))
}
