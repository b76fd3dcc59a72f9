use sea_orm::entity::prelude::*;
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: String,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: String,
    /// bcrypt hash
    pub password: String,
    pub role: String,
    pub mining_site: String,
    pub location: String,
    pub supervisor_id: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::module_completions::Entity")]
    ModuleCompletions,
}

impl Related<super::module_completions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ModuleCompletions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
