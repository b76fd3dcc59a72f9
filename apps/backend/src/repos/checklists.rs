//! Checklist items (pre-start and PPE share one table, split by `kind`)
//! and their per-day completions.

use sea_orm::sea_query::Condition;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use time::{Date, OffsetDateTime};

use crate::entities::{checklist_completions, checklist_items};
use crate::error::AppError;

pub use checklist_completions::Model as ChecklistCompletion;
pub use checklist_items::Model as ChecklistItem;

pub async fn create_item<C: ConnectionTrait>(
    conn: &C,
    kind: &str,
    supervisor_id: Option<String>,
    title: String,
    description: String,
    is_default: bool,
) -> Result<ChecklistItem, AppError> {
    let now = OffsetDateTime::now_utc();
    let active = checklist_items::ActiveModel {
        id: NotSet,
        supervisor_id: Set(supervisor_id),
        kind: Set(kind.to_string()),
        title: Set(title),
        description: Set(description),
        is_default: Set(is_default),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(active.insert(conn).await?)
}

pub async fn count_defaults<C: ConnectionTrait>(conn: &C, kind: &str) -> Result<u64, AppError> {
    Ok(checklist_items::Entity::find()
        .filter(checklist_items::Column::Kind.eq(kind))
        .filter(checklist_items::Column::IsDefault.eq(true))
        .count(conn)
        .await?)
}

/// Active defaults plus the supervisor's own active items; defaults first,
/// then oldest first.
pub async fn visible_items<C: ConnectionTrait>(
    conn: &C,
    kind: &str,
    supervisor_id: &str,
) -> Result<Vec<ChecklistItem>, AppError> {
    Ok(checklist_items::Entity::find()
        .filter(checklist_items::Column::Kind.eq(kind))
        .filter(checklist_items::Column::IsActive.eq(true))
        .filter(
            Condition::any()
                .add(checklist_items::Column::IsDefault.eq(true))
                .add(checklist_items::Column::SupervisorId.eq(supervisor_id)),
        )
        .order_by_desc(checklist_items::Column::IsDefault)
        .order_by_asc(checklist_items::Column::CreatedAt)
        .order_by_asc(checklist_items::Column::Id)
        .all(conn)
        .await?)
}

pub async fn find_item<C: ConnectionTrait>(
    conn: &C,
    kind: &str,
    id: i64,
) -> Result<Option<ChecklistItem>, AppError> {
    Ok(checklist_items::Entity::find_by_id(id)
        .filter(checklist_items::Column::Kind.eq(kind))
        .one(conn)
        .await?)
}

pub async fn deactivate_item<C: ConnectionTrait>(
    conn: &C,
    item: ChecklistItem,
) -> Result<ChecklistItem, AppError> {
    let mut active: checklist_items::ActiveModel = item.into();
    active.is_active = Set(false);
    active.updated_at = Set(OffsetDateTime::now_utc());
    Ok(active.update(conn).await?)
}

pub async fn completions_for_day<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    day: Date,
) -> Result<Vec<ChecklistCompletion>, AppError> {
    Ok(checklist_completions::Entity::find()
        .filter(checklist_completions::Column::UserId.eq(user_id))
        .filter(checklist_completions::Column::Date.eq(day))
        .all(conn)
        .await?)
}

/// Upsert keyed by user, item and day.
pub async fn set_completion<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    item_id: i64,
    is_completed: bool,
    now: OffsetDateTime,
) -> Result<ChecklistCompletion, AppError> {
    let existing = checklist_completions::Entity::find()
        .filter(checklist_completions::Column::UserId.eq(user_id))
        .filter(checklist_completions::Column::ItemId.eq(item_id))
        .filter(checklist_completions::Column::Date.eq(now.date()))
        .one(conn)
        .await?;

    match existing {
        Some(row) => {
            let mut active: checklist_completions::ActiveModel = row.into();
            active.is_completed = Set(is_completed);
            active.completed_at = Set(now);
            Ok(active.update(conn).await?)
        }
        None => {
            let active = checklist_completions::ActiveModel {
                id: NotSet,
                user_id: Set(user_id.to_string()),
                item_id: Set(item_id),
                is_completed: Set(is_completed),
                completed_at: Set(now),
                date: Set(now.date()),
            };
            Ok(active.insert(conn).await?)
        }
    }
}
