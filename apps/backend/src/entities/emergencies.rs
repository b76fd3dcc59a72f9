use sea_orm::entity::prelude::*;
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "emergencies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: String,
    /// client-generated id, unique per user
    pub emergency_id: i64,
    pub severity: String,
    pub latitude: f64,
    pub longitude: f64,
    pub issue: String,
    pub media_status: String,
    pub media_url: Option<String>,
    pub location: Option<String>,
    pub incident_time: Option<OffsetDateTime>,
    pub reporting_time: OffsetDateTime,
    pub status: String,
    pub resolution_time: Option<OffsetDateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
