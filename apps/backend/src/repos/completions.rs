//! Quiz completions. At most one row per miner, module and UTC day.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use time::{Date, OffsetDateTime, Time};

use crate::entities::module_completions;
use crate::error::AppError;
use crate::infra::db_errors::is_unique_violation;

pub use module_completions::Model as Completion;

/// `[start, end)` of a UTC calendar day.
pub fn day_bounds(day: Date) -> (OffsetDateTime, OffsetDateTime) {
    let start = day.with_time(Time::MIDNIGHT).assume_utc();
    (start, start + time::Duration::DAY)
}

pub async fn find_for_day<C: ConnectionTrait>(
    conn: &C,
    miner_id: &str,
    video_id: i64,
    day: Date,
) -> Result<Option<Completion>, AppError> {
    Ok(module_completions::Entity::find()
        .filter(module_completions::Column::MinerId.eq(miner_id))
        .filter(module_completions::Column::VideoId.eq(video_id))
        .filter(module_completions::Column::CompletedOn.eq(day))
        .one(conn)
        .await?)
}

async fn overwrite<C: ConnectionTrait>(
    conn: &C,
    existing: Completion,
    score: i32,
    total_questions: i32,
    now: OffsetDateTime,
) -> Result<Completion, AppError> {
    let mut active: module_completions::ActiveModel = existing.into();
    active.score = Set(score);
    active.total_questions = Set(total_questions);
    active.completed_at = Set(now);
    Ok(active.update(conn).await?)
}

/// Insert today's completion or overwrite the score of the existing one.
///
/// A concurrent insert for the same day trips the unique index; the loser
/// overwrites the winner's row instead of failing.
pub async fn record<C: ConnectionTrait>(
    conn: &C,
    miner_id: &str,
    video_id: i64,
    score: i32,
    total_questions: i32,
    now: OffsetDateTime,
) -> Result<Completion, AppError> {
    let day = now.date();
    if let Some(existing) = find_for_day(conn, miner_id, video_id, day).await? {
        return overwrite(conn, existing, score, total_questions, now).await;
    }

    let active = module_completions::ActiveModel {
        id: NotSet,
        miner_id: Set(miner_id.to_string()),
        video_id: Set(video_id),
        score: Set(score),
        total_questions: Set(total_questions),
        completed_at: Set(now),
        completed_on: Set(day),
    };
    match active.insert(conn).await {
        Ok(row) => Ok(row),
        Err(e) if is_unique_violation(&e.to_string()) => {
            let existing = find_for_day(conn, miner_id, video_id, day)
                .await?
                .ok_or_else(|| AppError::from(e))?;
            overwrite(conn, existing, score, total_questions, now).await
        }
        Err(e) => Err(e.into()),
    }
}

/// Every completion by the given miners, newest first.
pub async fn for_miners<C: ConnectionTrait>(
    conn: &C,
    miner_ids: Vec<String>,
) -> Result<Vec<Completion>, AppError> {
    if miner_ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(module_completions::Entity::find()
        .filter(module_completions::Column::MinerId.is_in(miner_ids))
        .order_by_desc(module_completions::Column::CompletedAt)
        .all(conn)
        .await?)
}

pub async fn for_miners_since<C: ConnectionTrait>(
    conn: &C,
    miner_ids: Vec<String>,
    since: OffsetDateTime,
) -> Result<Vec<Completion>, AppError> {
    if miner_ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(module_completions::Entity::find()
        .filter(module_completions::Column::MinerId.is_in(miner_ids))
        .filter(module_completions::Column::CompletedAt.gte(since))
        .all(conn)
        .await?)
}

pub async fn recent_for_miner<C: ConnectionTrait>(
    conn: &C,
    miner_id: &str,
    limit: u64,
) -> Result<Vec<Completion>, AppError> {
    Ok(module_completions::Entity::find()
        .filter(module_completions::Column::MinerId.eq(miner_id))
        .order_by_desc(module_completions::Column::CompletedAt)
        .order_by_desc(module_completions::Column::Id)
        .limit(limit)
        .all(conn)
        .await?)
}
