use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub video_id: i64,
    pub question: String,
    /// JSON array of option strings
    #[sea_orm(column_type = "Text")]
    pub options: String,
    /// zero-based index into `options`
    pub answer: i32,
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
