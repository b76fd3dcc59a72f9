//! User rows: supervisors, miners and administrators share one table.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;

use crate::auth::Role;
use crate::entities::users;
use crate::error::AppError;

pub use users::Model as User;

/// Fields for a new `users` row. The caller has already hashed the password.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub role: Role,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub mining_site: String,
    pub location: String,
    pub supervisor_id: Option<String>,
}

/// Mutable profile fields. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mining_site: Option<String>,
    pub location: Option<String>,
}

pub async fn create_user<C: ConnectionTrait>(conn: &C, dto: UserCreate) -> Result<User, AppError> {
    let now = OffsetDateTime::now_utc();
    let active = users::ActiveModel {
        id: NotSet,
        user_id: Set(dto.role.new_user_id()),
        name: Set(dto.name),
        email: Set(dto.email),
        phone: Set(dto.phone),
        password: Set(dto.password_hash),
        role: Set(dto.role.as_str().to_string()),
        mining_site: Set(dto.mining_site),
        location: Set(dto.location),
        supervisor_id: Set(dto.supervisor_id),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(active.insert(conn).await?)
}

pub async fn find_by_email<C: ConnectionTrait>(
    conn: &C,
    email: &str,
) -> Result<Option<User>, AppError> {
    Ok(users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(conn)
        .await?)
}

pub async fn email_exists<C: ConnectionTrait>(conn: &C, email: &str) -> Result<bool, AppError> {
    let count = users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .count(conn)
        .await?;
    Ok(count > 0)
}

pub async fn find_by_user_id<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
) -> Result<Option<User>, AppError> {
    Ok(users::Entity::find()
        .filter(users::Column::UserId.eq(user_id))
        .one(conn)
        .await?)
}

pub async fn find_with_role<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    role: Role,
) -> Result<Option<User>, AppError> {
    Ok(users::Entity::find()
        .filter(users::Column::UserId.eq(user_id))
        .filter(users::Column::Role.eq(role.as_str()))
        .one(conn)
        .await?)
}

/// Miners reporting to `supervisor_id`, newest first.
pub async fn list_miners<C: ConnectionTrait>(
    conn: &C,
    supervisor_id: &str,
) -> Result<Vec<User>, AppError> {
    Ok(users::Entity::find()
        .filter(users::Column::SupervisorId.eq(supervisor_id))
        .filter(users::Column::Role.eq(Role::Miner.as_str()))
        .order_by_desc(users::Column::CreatedAt)
        .order_by_desc(users::Column::Id)
        .all(conn)
        .await?)
}

pub async fn find_miner<C: ConnectionTrait>(
    conn: &C,
    supervisor_id: &str,
    miner_id: &str,
) -> Result<Option<User>, AppError> {
    Ok(users::Entity::find()
        .filter(users::Column::UserId.eq(miner_id))
        .filter(users::Column::SupervisorId.eq(supervisor_id))
        .filter(users::Column::Role.eq(Role::Miner.as_str()))
        .one(conn)
        .await?)
}

pub async fn count_miners<C: ConnectionTrait>(
    conn: &C,
    supervisor_id: &str,
) -> Result<u64, AppError> {
    Ok(users::Entity::find()
        .filter(users::Column::SupervisorId.eq(supervisor_id))
        .filter(users::Column::Role.eq(Role::Miner.as_str()))
        .count(conn)
        .await?)
}

pub async fn list_by_role<C: ConnectionTrait>(conn: &C, role: Role) -> Result<Vec<User>, AppError> {
    Ok(users::Entity::find()
        .filter(users::Column::Role.eq(role.as_str()))
        .order_by_desc(users::Column::CreatedAt)
        .order_by_desc(users::Column::Id)
        .all(conn)
        .await?)
}

/// Names keyed by `user_id` for the given ids.
pub async fn names_by_user_id<C: ConnectionTrait>(
    conn: &C,
    user_ids: Vec<String>,
) -> Result<std::collections::HashMap<String, String>, AppError> {
    if user_ids.is_empty() {
        return Ok(Default::default());
    }
    let rows = users::Entity::find()
        .filter(users::Column::UserId.is_in(user_ids))
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(|u| (u.user_id, u.name)).collect())
}

pub async fn update_user<C: ConnectionTrait>(
    conn: &C,
    user: User,
    dto: UserUpdate,
) -> Result<User, AppError> {
    let mut active: users::ActiveModel = user.into();
    if let Some(name) = dto.name {
        active.name = Set(name);
    }
    if let Some(email) = dto.email {
        active.email = Set(email);
    }
    if let Some(phone) = dto.phone {
        active.phone = Set(phone);
    }
    if let Some(site) = dto.mining_site {
        active.mining_site = Set(site);
    }
    if let Some(location) = dto.location {
        active.location = Set(location);
    }
    active.updated_at = Set(OffsetDateTime::now_utc());
    Ok(active.update(conn).await?)
}

pub async fn delete_user<C: ConnectionTrait>(conn: &C, id: i64) -> Result<u64, AppError> {
    let res = users::Entity::delete_by_id(id).exec(conn).await?;
    Ok(res.rows_affected)
}
