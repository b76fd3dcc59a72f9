//! Training video modules, their quiz questions and the daily star pick.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use time::{Date, OffsetDateTime};

use crate::entities::{questions, star_videos, video_modules};
use crate::error::AppError;

pub use questions::Model as Question;
pub use star_videos::Model as StarVideo;
pub use video_modules::Model as VideoModule;

#[derive(Debug, Clone)]
pub struct VideoModuleCreate {
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub duration: i32,
    pub category: String,
    pub thumbnail: String,
    pub created_by: Option<String>,
}

pub async fn create_module<C: ConnectionTrait>(
    conn: &C,
    dto: VideoModuleCreate,
) -> Result<VideoModule, AppError> {
    let now = OffsetDateTime::now_utc();
    let active = video_modules::ActiveModel {
        id: NotSet,
        title: Set(dto.title),
        description: Set(dto.description),
        video_url: Set(dto.video_url),
        duration: Set(dto.duration),
        category: Set(dto.category),
        thumbnail: Set(dto.thumbnail),
        is_active: Set(true),
        created_by: Set(dto.created_by),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(active.insert(conn).await?)
}

/// Active modules, newest first.
pub async fn list_active<C: ConnectionTrait>(conn: &C) -> Result<Vec<VideoModule>, AppError> {
    Ok(video_modules::Entity::find()
        .filter(video_modules::Column::IsActive.eq(true))
        .order_by_desc(video_modules::Column::CreatedAt)
        .order_by_desc(video_modules::Column::Id)
        .all(conn)
        .await?)
}

pub async fn count_active<C: ConnectionTrait>(conn: &C) -> Result<u64, AppError> {
    Ok(video_modules::Entity::find()
        .filter(video_modules::Column::IsActive.eq(true))
        .count(conn)
        .await?)
}

pub async fn find_module<C: ConnectionTrait>(
    conn: &C,
    id: i64,
) -> Result<Option<VideoModule>, AppError> {
    Ok(video_modules::Entity::find_by_id(id).one(conn).await?)
}

pub async fn find_modules<C: ConnectionTrait>(
    conn: &C,
    ids: Vec<i64>,
) -> Result<Vec<VideoModule>, AppError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(video_modules::Entity::find()
        .filter(video_modules::Column::Id.is_in(ids))
        .all(conn)
        .await?)
}

pub async fn create_question<C: ConnectionTrait>(
    conn: &C,
    video_id: i64,
    question: String,
    options_json: String,
    answer: i32,
) -> Result<Question, AppError> {
    let active = questions::ActiveModel {
        id: NotSet,
        video_id: Set(video_id),
        question: Set(question),
        options: Set(options_json),
        answer: Set(answer),
    };
    Ok(active.insert(conn).await?)
}

/// Questions for `video_id` in id order; answers are scored in this order.
pub async fn questions_for<C: ConnectionTrait>(
    conn: &C,
    video_id: i64,
) -> Result<Vec<Question>, AppError> {
    Ok(questions::Entity::find()
        .filter(questions::Column::VideoId.eq(video_id))
        .order_by_asc(questions::Column::Id)
        .all(conn)
        .await?)
}

pub async fn star_for_day<C: ConnectionTrait>(
    conn: &C,
    supervisor_id: &str,
    day: Date,
) -> Result<Option<StarVideo>, AppError> {
    Ok(star_videos::Entity::find()
        .filter(star_videos::Column::SupervisorId.eq(supervisor_id))
        .filter(star_videos::Column::SetDate.eq(day))
        .one(conn)
        .await?)
}

pub async fn active_star_for_day<C: ConnectionTrait>(
    conn: &C,
    supervisor_id: &str,
    day: Date,
) -> Result<Option<StarVideo>, AppError> {
    Ok(star_videos::Entity::find()
        .filter(star_videos::Column::SupervisorId.eq(supervisor_id))
        .filter(star_videos::Column::SetDate.eq(day))
        .filter(star_videos::Column::IsActive.eq(true))
        .one(conn)
        .await?)
}

/// Make `video_id` the supervisor's only active star for `day`.
pub async fn set_star<C: ConnectionTrait>(
    conn: &C,
    supervisor_id: &str,
    video_id: i64,
    day: Date,
) -> Result<StarVideo, AppError> {
    star_videos::Entity::update_many()
        .col_expr(star_videos::Column::IsActive, Expr::value(false))
        .filter(star_videos::Column::SupervisorId.eq(supervisor_id))
        .filter(star_videos::Column::IsActive.eq(true))
        .exec(conn)
        .await?;

    match star_for_day(conn, supervisor_id, day).await? {
        Some(existing) => {
            let mut active: star_videos::ActiveModel = existing.into();
            active.video_id = Set(video_id);
            active.is_active = Set(true);
            Ok(active.update(conn).await?)
        }
        None => {
            let active = star_videos::ActiveModel {
                id: NotSet,
                video_id: Set(video_id),
                supervisor_id: Set(supervisor_id.to_string()),
                set_date: Set(day),
                is_active: Set(true),
            };
            Ok(active.insert(conn).await?)
        }
    }
}
