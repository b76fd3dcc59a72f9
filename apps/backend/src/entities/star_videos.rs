use sea_orm::entity::prelude::*;
use time::Date;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "star_videos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub video_id: i64,
    pub supervisor_id: String,
    pub set_date: Date,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::video_modules::Entity",
        from = "Column::VideoId",
        to = "super::video_modules::Column::Id",
        on_delete = "Cascade"
    )]
    VideoModules,
}

impl Related<super::video_modules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VideoModules.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
