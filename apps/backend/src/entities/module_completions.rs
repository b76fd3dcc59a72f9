use sea_orm::entity::prelude::*;
use time::{Date, OffsetDateTime};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "module_completions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub miner_id: String,
    pub video_id: i64,
    pub score: i32,
    pub total_questions: i32,
    pub completed_at: OffsetDateTime,
    /// UTC day of `completed_at`; unique per miner and module.
    pub completed_on: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::MinerId",
        to = "super::users::Column::UserId",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::video_modules::Entity",
        from = "Column::VideoId",
        to = "super::video_modules::Column::Id",
        on_delete = "Cascade"
    )]
    VideoModules,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::video_modules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VideoModules.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
