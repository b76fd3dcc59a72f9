use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use time::OffsetDateTime;

use crate::entities::emergencies;
use crate::error::AppError;

pub use emergencies::Model as Emergency;

const LIST_LIMIT: u64 = 100;

#[derive(Debug, Clone)]
pub struct EmergencyCreate {
    pub user_id: String,
    pub emergency_id: i64,
    pub severity: String,
    pub latitude: f64,
    pub longitude: f64,
    pub issue: String,
    pub media_status: String,
    pub location: Option<String>,
    pub incident_time: Option<OffsetDateTime>,
    pub status: String,
}

#[derive(Debug, Clone, Default)]
pub struct EmergencyFilter {
    pub status: Option<String>,
    pub user_id: Option<String>,
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    dto: EmergencyCreate,
) -> Result<Emergency, AppError> {
    let active = emergencies::ActiveModel {
        id: NotSet,
        user_id: Set(dto.user_id),
        emergency_id: Set(dto.emergency_id),
        severity: Set(dto.severity),
        latitude: Set(dto.latitude),
        longitude: Set(dto.longitude),
        issue: Set(dto.issue),
        media_status: Set(dto.media_status),
        media_url: Set(None),
        location: Set(dto.location),
        incident_time: Set(dto.incident_time),
        reporting_time: Set(OffsetDateTime::now_utc()),
        status: Set(dto.status),
        resolution_time: Set(None),
    };
    Ok(active.insert(conn).await?)
}

pub async fn find_by_client_id<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    emergency_id: i64,
) -> Result<Option<Emergency>, AppError> {
    Ok(emergencies::Entity::find()
        .filter(emergencies::Column::UserId.eq(user_id))
        .filter(emergencies::Column::EmergencyId.eq(emergency_id))
        .one(conn)
        .await?)
}

pub async fn find<C: ConnectionTrait>(conn: &C, id: i64) -> Result<Option<Emergency>, AppError> {
    Ok(emergencies::Entity::find_by_id(id).one(conn).await?)
}

/// Newest reports first, capped at 100.
pub async fn list<C: ConnectionTrait>(
    conn: &C,
    filter: EmergencyFilter,
) -> Result<Vec<Emergency>, AppError> {
    let mut query = emergencies::Entity::find();
    if let Some(status) = filter.status {
        query = query.filter(emergencies::Column::Status.eq(status));
    }
    if let Some(user_id) = filter.user_id {
        query = query.filter(emergencies::Column::UserId.eq(user_id));
    }
    Ok(query
        .order_by_desc(emergencies::Column::ReportingTime)
        .order_by_desc(emergencies::Column::Id)
        .limit(LIST_LIMIT)
        .all(conn)
        .await?)
}

pub async fn update_media<C: ConnectionTrait>(
    conn: &C,
    emergency: Emergency,
    media_url: Option<String>,
    media_status: String,
) -> Result<Emergency, AppError> {
    let mut active: emergencies::ActiveModel = emergency.into();
    active.media_url = Set(media_url);
    active.media_status = Set(media_status);
    Ok(active.update(conn).await?)
}

pub async fn update_status<C: ConnectionTrait>(
    conn: &C,
    emergency: Emergency,
    status: String,
    resolution_time: Option<OffsetDateTime>,
) -> Result<Emergency, AppError> {
    let mut active: emergencies::ActiveModel = emergency.into();
    active.status = Set(status);
    active.resolution_time = Set(resolution_time);
    Ok(active.update(conn).await?)
}
