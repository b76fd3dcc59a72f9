use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::test;
use minesafe_backend::auth::Role;
use minesafe_backend::db::require_db;
use minesafe_backend::repos::completions;
use time::{Duration, OffsetDateTime};

use crate::common::json_with_status;
use crate::support::factory::{create_miner, create_module_with_quiz, create_supervisor};
use crate::support::{bearer_for, create_test_app, test_state};

#[actix_web::test]
async fn calendar_and_team_streaks() {
    let state = test_state().await;
    let db = require_db(&state).unwrap();
    let sup = create_supervisor(db, "Sam").await;
    let max = create_miner(db, &sup, "Max").await;
    let _idle = create_miner(db, &sup, "Ida").await;
    let video = create_module_with_quiz(db, &sup, "Fatigue", &[0, 1]).await;

    let now = OffsetDateTime::now_utc();
    for days_ago in [0, 1, 2, 5] {
        completions::record(db, &max.user_id, video, 2, 2, now - Duration::days(days_ago))
            .await
            .unwrap();
    }
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get()
        .uri("/api/streak/calendar")
        .insert_header((AUTHORIZATION, bearer_for(&max.user_id, Role::Miner)))
        .to_request();
    let cal = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(cal["user_name"], "Max");
    assert_eq!(cal["current_streak"], 3);
    assert_eq!(cal["longest_streak"], 3);
    assert_eq!(cal["total_days"], 4);

    let req = test::TestRequest::get()
        .uri("/api/completions/me")
        .insert_header((AUTHORIZATION, bearer_for(&max.user_id, Role::Miner)))
        .to_request();
    let history = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(history.as_array().unwrap().len(), 4);
    assert_eq!(history[0]["video_title"], "Fatigue");
    assert_eq!(history[0]["percentage"], 100.0);

    let req = test::TestRequest::get()
        .uri("/api/streaks")
        .insert_header((AUTHORIZATION, bearer_for(&sup.user_id, Role::Supervisor)))
        .to_request();
    let team = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
    let team = team.as_array().unwrap();
    assert_eq!(team.len(), 2);
    assert_eq!(team[0]["miner_name"], "Max");
    assert_eq!(team[0]["current_streak"], 4);
    assert_eq!(team[1]["miner_name"], "Ida");
    assert_eq!(team[1]["current_streak"], 0);
}

#[actix_web::test]
async fn dashboard_counts_team_activity() {
    let state = test_state().await;
    let db = require_db(&state).unwrap();
    let sup = create_supervisor(db, "Sam").await;
    let max = create_miner(db, &sup, "Max").await;
    let _ida = create_miner(db, &sup, "Ida").await;
    let video = create_module_with_quiz(db, &sup, "Fatigue", &[0, 1]).await;
    completions::record(db, &max.user_id, video, 1, 2, OffsetDateTime::now_utc())
        .await
        .unwrap();
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get()
        .uri("/api/dashboard/stats")
        .insert_header((AUTHORIZATION, bearer_for(&sup.user_id, Role::Supervisor)))
        .to_request();
    let stats = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;

    assert_eq!(stats["total_miners"], 2);
    assert_eq!(stats["active_miners"], 1);
    assert_eq!(stats["total_modules"], 1);
    assert_eq!(stats["monthly_completions"], 1);
    // No star set today.
    assert_eq!(stats["today_completions"], 0);
}
