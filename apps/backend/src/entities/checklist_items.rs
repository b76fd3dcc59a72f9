use sea_orm::entity::prelude::*;
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "checklist_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// `None` for the built-in defaults
    pub supervisor_id: Option<String>,
    /// `pre-start` or `ppe`
    pub kind: String,
    pub title: String,
    pub description: String,
    pub is_default: bool,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::checklist_completions::Entity")]
    ChecklistCompletions,
}

impl Related<super::checklist_completions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChecklistCompletions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
