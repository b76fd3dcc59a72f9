use sea_orm::entity::prelude::*;
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "video_modules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub description: String,
    pub video_url: String,
    /// seconds
    pub duration: i32,
    pub category: String,
    pub thumbnail: String,
    pub is_active: bool,
    pub created_by: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::questions::Entity")]
    Questions,
    #[sea_orm(has_many = "super::module_completions::Entity")]
    ModuleCompletions,
}

impl Related<super::questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Questions.def()
    }
}

impl Related<super::module_completions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ModuleCompletions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
