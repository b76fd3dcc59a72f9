use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::test;
use minesafe_backend::auth::Role;
use minesafe_backend::db::require_db;
use serde_json::json;

use crate::common::{assert_problem, json_with_status};
use crate::support::factory::{create_miner, create_module_with_quiz, create_supervisor};
use crate::support::{bearer_for, create_test_app, test_state};

#[actix_web::test]
async fn supervisor_authors_module_and_questions() {
    let state = test_state().await;
    let sup = create_supervisor(require_db(&state).unwrap(), "Sam").await;
    let app = create_test_app(state).build().await;
    let auth = bearer_for(&sup.user_id, Role::Supervisor);

    let req = test::TestRequest::post()
        .uri("/api/modules")
        .insert_header((AUTHORIZATION, auth.clone()))
        .set_json(json!({
            "title": "Ground Control",
            "video_url": "https://videos.minesafe.test/gc.mp4",
            "duration": 420
        }))
        .to_request();
    let module = json_with_status(test::call_service(&app, req).await, StatusCode::CREATED).await;
    let id = module["id"].as_i64().unwrap();
    assert_eq!(module["created_by"], sup.user_id.as_str());

    let req = test::TestRequest::post()
        .uri("/api/modules/questions")
        .insert_header((AUTHORIZATION, auth.clone()))
        .set_json(json!({
            "video_id": id,
            "question": "Where is the muster point?",
            "options": ["Gate A", "Workshop", "Crib room"],
            "answer": 2
        }))
        .to_request();
    json_with_status(test::call_service(&app, req).await, StatusCode::CREATED).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/modules/{id}/questions"))
        .insert_header((AUTHORIZATION, auth))
        .to_request();
    let questions = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(questions[0]["options"], json!(["Gate A", "Workshop", "Crib room"]));
    assert_eq!(questions[0]["answer"], 2);
}

#[actix_web::test]
async fn module_creation_validates_input() {
    let state = test_state().await;
    let sup = create_supervisor(require_db(&state).unwrap(), "Sam").await;
    let app = create_test_app(state).build().await;
    let auth = bearer_for(&sup.user_id, Role::Supervisor);

    let req = test::TestRequest::post()
        .uri("/api/modules")
        .insert_header((AUTHORIZATION, auth.clone()))
        .set_json(json!({ "title": "No video" }))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        "VALIDATION_ERROR",
        "Title and video URL are required",
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/modules/questions")
        .insert_header((AUTHORIZATION, auth))
        .set_json(json!({ "video_id": 1, "question": "Empty?" }))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        "VALIDATION_ERROR",
        "Question and options are required",
    )
    .await;
}

#[actix_web::test]
async fn miner_cannot_author_modules() {
    let state = test_state().await;
    let db = require_db(&state).unwrap();
    let sup = create_supervisor(db, "Sam").await;
    let miner = create_miner(db, &sup, "Max").await;
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::post()
        .uri("/api/modules")
        .insert_header((AUTHORIZATION, bearer_for(&miner.user_id, Role::Miner)))
        .set_json(json!({ "title": "t", "video_url": "u" }))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::FORBIDDEN,
        "SUPERVISOR_REQUIRED",
        "Supervisor access required",
    )
    .await;
}

#[actix_web::test]
async fn submit_scores_and_replaces_todays_attempt() {
    let state = test_state().await;
    let db = require_db(&state).unwrap();
    let sup = create_supervisor(db, "Sam").await;
    let miner = create_miner(db, &sup, "Max").await;
    let video_id = create_module_with_quiz(db, &sup, "Ventilation", &[0, 1, 0, 1]).await;
    let app = create_test_app(state).build().await;
    let auth = bearer_for(&miner.user_id, Role::Miner);

    let req = test::TestRequest::post()
        .uri("/api/modules/submit")
        .insert_header((AUTHORIZATION, auth.clone()))
        .set_json(json!({ "video_id": video_id, "answers": [0, 1, 1, 0] }))
        .to_request();
    let first = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(first["score"], 2);
    assert_eq!(first["total_questions"], 4);
    assert_eq!(first["percentage"], 50.0);
    assert_eq!(first["message"], "Module completed successfully");

    let req = test::TestRequest::post()
        .uri("/api/modules/submit")
        .insert_header((AUTHORIZATION, auth.clone()))
        .set_json(json!({ "video_id": video_id, "answers": [0, 1, 0, 1] }))
        .to_request();
    let second = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(second["score"], 4);
    assert_eq!(second["completion_id"], first["completion_id"]);

    let req = test::TestRequest::post()
        .uri("/api/modules/submit")
        .insert_header((AUTHORIZATION, auth))
        .set_json(json!({ "video_id": video_id, "answers": [0] }))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        "VALIDATION_ERROR",
        "Answer count doesn't match question count",
    )
    .await;
}

#[actix_web::test]
async fn star_module_follows_the_miners_supervisor() {
    let state = test_state().await;
    let db = require_db(&state).unwrap();
    let sup = create_supervisor(db, "Sam").await;
    let miner = create_miner(db, &sup, "Max").await;
    let first = create_module_with_quiz(db, &sup, "Explosives", &[0]).await;
    let second = create_module_with_quiz(db, &sup, "Hearing", &[1]).await;
    let app = create_test_app(state).build().await;
    let sup_auth = bearer_for(&sup.user_id, Role::Supervisor);
    let miner_auth = bearer_for(&miner.user_id, Role::Miner);

    let req = test::TestRequest::get()
        .uri("/api/modules/star")
        .insert_header((AUTHORIZATION, miner_auth.clone()))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::NOT_FOUND,
        "STAR_VIDEO_NOT_SET",
        "No star video set for today",
    )
    .await;

    for id in [first, second] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/modules/{id}/star"))
            .insert_header((AUTHORIZATION, sup_auth.clone()))
            .to_request();
        let set = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
        assert_eq!(set["video_id"], id);
        assert_eq!(set["is_active"], true);
    }

    let req = test::TestRequest::get()
        .uri("/api/modules/star")
        .insert_header((AUTHORIZATION, miner_auth))
        .to_request();
    let star = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(star["id"], second);
    assert_eq!(star["title"], "Hearing");
}

#[actix_web::test]
async fn bad_module_ids() {
    let state = test_state().await;
    let sup = create_supervisor(require_db(&state).unwrap(), "Sam").await;
    let app = create_test_app(state).build().await;
    let auth = bearer_for(&sup.user_id, Role::Supervisor);

    let req = test::TestRequest::get()
        .uri("/api/modules/abc")
        .insert_header((AUTHORIZATION, auth.clone()))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::get()
        .uri("/api/modules/9999")
        .insert_header((AUTHORIZATION, auth))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::NOT_FOUND,
        "MODULE_NOT_FOUND",
        "Video module not found",
    )
    .await;
}
