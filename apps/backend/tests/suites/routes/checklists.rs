use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::test;
use minesafe_backend::auth::Role;
use minesafe_backend::db::require_db;
use serde_json::json;

use crate::common::{assert_problem, json_with_status};
use crate::support::factory::{create_miner, create_supervisor, create_unassigned_miner};
use crate::support::{bearer_for, create_test_app, test_state};

#[actix_web::test]
async fn miner_sees_defaults_plus_supervisor_items() {
    let state = test_state().await;
    let db = require_db(&state).unwrap();
    let sup = create_supervisor(db, "Sam").await;
    let other = create_supervisor(db, "Kim").await;
    let miner = create_miner(db, &sup, "Max").await;
    let app = create_test_app(state).build().await;

    for (owner, title) in [(&sup, "Gas detector bump test"), (&other, "Not mine")] {
        let req = test::TestRequest::post()
            .uri("/api/checklists/pre-start/items")
            .insert_header((AUTHORIZATION, bearer_for(&owner.user_id, Role::Supervisor)))
            .set_json(json!({ "title": title, "description": "" }))
            .to_request();
        json_with_status(test::call_service(&app, req).await, StatusCode::CREATED).await;
    }

    let req = test::TestRequest::get()
        .uri("/api/checklists/pre-start")
        .insert_header((AUTHORIZATION, bearer_for(&miner.user_id, Role::Miner)))
        .to_request();
    let items = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
    let titles: Vec<&str> = items
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["title"].as_str().unwrap())
        .collect();

    assert_eq!(
        titles,
        [
            "Vehicle Inspection",
            "Communication Check",
            "Work Area Assessment",
            "Gas detector bump test"
        ]
    );
    assert_eq!(items[0]["is_completed"], false);
}

#[actix_web::test]
async fn completion_is_tracked_per_day() {
    let state = test_state().await;
    let db = require_db(&state).unwrap();
    let sup = create_supervisor(db, "Sam").await;
    let miner = create_miner(db, &sup, "Max").await;
    let app = create_test_app(state).build().await;
    let auth = bearer_for(&miner.user_id, Role::Miner);

    let req = test::TestRequest::get()
        .uri("/api/checklists/ppe")
        .insert_header((AUTHORIZATION, auth.clone()))
        .to_request();
    let items = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
    let hard_hat = items[0]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/checklists/ppe/complete")
        .insert_header((AUTHORIZATION, auth.clone()))
        .set_json(json!({ "item_id": hard_hat, "is_completed": true }))
        .to_request();
    let body = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(body["message"], "Completion updated successfully");

    let req = test::TestRequest::get()
        .uri("/api/checklists/ppe")
        .insert_header((AUTHORIZATION, auth.clone()))
        .to_request();
    let items = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(items[0]["is_completed"], true);
    assert!(items[0]["completed_at"].is_string());
    assert_eq!(items[1]["is_completed"], false);

    let req = test::TestRequest::post()
        .uri("/api/checklists/ppe/complete")
        .insert_header((AUTHORIZATION, auth))
        .set_json(json!({ "item_id": 99999, "is_completed": true }))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::NOT_FOUND,
        "CHECKLIST_ITEM_NOT_FOUND",
        "Checklist item not found",
    )
    .await;
}

#[actix_web::test]
async fn supervisor_deletes_only_own_items() {
    let state = test_state().await;
    let sup = create_supervisor(require_db(&state).unwrap(), "Sam").await;
    let app = create_test_app(state).build().await;
    let auth = bearer_for(&sup.user_id, Role::Supervisor);

    let req = test::TestRequest::post()
        .uri("/api/checklists/ppe/items")
        .insert_header((AUTHORIZATION, auth.clone()))
        .set_json(json!({ "title": "Ear plugs" }))
        .to_request();
    let item = json_with_status(test::call_service(&app, req).await, StatusCode::CREATED).await;
    assert_eq!(item["is_default"], false);
    let own = item["id"].as_i64().unwrap();

    let req = test::TestRequest::get()
        .uri("/api/checklists/ppe/items")
        .insert_header((AUTHORIZATION, auth.clone()))
        .to_request();
    let items = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(items.as_array().unwrap().len(), 4);
    let default_id = items[0]["id"].as_i64().unwrap();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/checklists/ppe/items/{default_id}"))
        .insert_header((AUTHORIZATION, auth.clone()))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::NOT_FOUND,
        "CHECKLIST_ITEM_NOT_FOUND",
        "Item not found or cannot be deleted",
    )
    .await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/checklists/ppe/items/{own}"))
        .insert_header((AUTHORIZATION, auth.clone()))
        .to_request();
    let body = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(body["message"], "Item deleted successfully");

    let req = test::TestRequest::get()
        .uri("/api/checklists/ppe/items")
        .insert_header((AUTHORIZATION, auth))
        .to_request();
    let items = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(items.as_array().unwrap().len(), 3);
}

#[actix_web::test]
async fn unknown_kind_and_unassigned_miner() {
    let state = test_state().await;
    let miner = create_unassigned_miner(require_db(&state).unwrap(), "Lone").await;
    let app = create_test_app(state).build().await;
    let auth = bearer_for(&miner.user_id, Role::Miner);

    let req = test::TestRequest::get()
        .uri("/api/checklists/helmets")
        .insert_header((AUTHORIZATION, auth.clone()))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        "INVALID_CHECKLIST_KIND",
        "Checklist must be 'pre-start' or 'ppe'",
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/checklists/ppe")
        .insert_header((AUTHORIZATION, auth))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        "MINER_NOT_ASSIGNED",
        "User is not assigned to a supervisor",
    )
    .await;
}
