use sea_orm::entity::prelude::*;
use time::{Date, OffsetDateTime};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "checklist_completions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: String,
    pub item_id: i64,
    pub is_completed: bool,
    pub completed_at: OffsetDateTime,
    pub date: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::checklist_items::Entity",
        from = "Column::ItemId",
        to = "super::checklist_items::Column::Id",
        on_delete = "Cascade"
    )]
    ChecklistItems,
}

impl Related<super::checklist_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChecklistItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
