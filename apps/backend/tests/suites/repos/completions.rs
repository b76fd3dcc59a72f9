use minesafe_backend::db::require_db;
use minesafe_backend::entities::module_completions;
use minesafe_backend::error::AppError;
use minesafe_backend::errors::ErrorCode;
use minesafe_backend::repos::completions;
use sea_orm::{ActiveModelTrait, EntityTrait, NotSet, Set};
use time::macros::datetime;
use time::Duration;

use crate::support::factory::{create_miner, create_module_with_quiz, create_supervisor};
use crate::support::test_state;

#[tokio::test]
async fn same_day_attempts_share_one_row() {
    let state = test_state().await;
    let db = require_db(&state).unwrap();
    let sup = create_supervisor(db, "Sam").await;
    let max = create_miner(db, &sup, "Max").await;
    let video = create_module_with_quiz(db, &sup, "Ladders", &[0, 1]).await;

    let morning = datetime!(2026-03-02 06:30 UTC);
    let first = completions::record(db, &max.user_id, video, 1, 2, morning)
        .await
        .unwrap();
    let second = completions::record(db, &max.user_id, video, 2, 2, morning + Duration::hours(9))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.score, 2);
    assert_eq!(second.completed_on, morning.date());

    let next_day = completions::record(db, &max.user_id, video, 0, 2, morning + Duration::DAY)
        .await
        .unwrap();
    assert_ne!(next_day.id, first.id);

    let rows = module_completions::Entity::find().all(db).await.unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn schema_rejects_second_row_for_the_same_day() {
    let state = test_state().await;
    let db = require_db(&state).unwrap();
    let sup = create_supervisor(db, "Sam").await;
    let max = create_miner(db, &sup, "Max").await;
    let video = create_module_with_quiz(db, &sup, "Ladders", &[0]).await;

    let at = datetime!(2026-03-02 08:00 UTC);
    completions::record(db, &max.user_id, video, 1, 1, at)
        .await
        .unwrap();

    let duplicate = module_completions::ActiveModel {
        id: NotSet,
        miner_id: Set(max.user_id.clone()),
        video_id: Set(video),
        score: Set(0),
        total_questions: Set(1),
        completed_at: Set(at + Duration::hours(1)),
        completed_on: Set(at.date()),
    };
    let err = AppError::from(duplicate.insert(db).await.unwrap_err());
    assert_eq!(err.code(), ErrorCode::Conflict);

    let after = completions::find_for_day(db, &max.user_id, video, at.date())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.score, 1);
}
