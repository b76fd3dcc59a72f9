use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::test;
use minesafe_backend::auth::Role;
use minesafe_backend::db::require_db;
use serde_json::json;

use crate::common::{assert_problem, json_with_status};
use crate::support::factory::{create_miner, create_supervisor};
use crate::support::{bearer_for, create_test_app, test_state};

#[actix_web::test]
async fn repeat_report_returns_stored_row() {
    let state = test_state().await;
    let db = require_db(&state).unwrap();
    let sup = create_supervisor(db, "Sam").await;
    let miner = create_miner(db, &sup, "Max").await;
    let app = create_test_app(state).build().await;
    let auth = bearer_for(&miner.user_id, Role::Miner);
    let report = json!({
        "emergency_id": 1717,
        "severity": "HIGH",
        "latitude": -30.7489,
        "longitude": 121.4658,
        "issue": "Roof fall in drive 3",
        "incident_time": "2025-03-04T05:06:07Z"
    });

    let req = test::TestRequest::post()
        .uri("/api/emergencies")
        .insert_header((AUTHORIZATION, auth.clone()))
        .set_json(&report)
        .to_request();
    let created = json_with_status(test::call_service(&app, req).await, StatusCode::CREATED).await;
    assert_eq!(created["user_id"], miner.user_id.as_str());
    assert_eq!(created["status"], "PENDING");
    assert_eq!(created["media_status"], "NOT_APPLICABLE");
    assert_eq!(created["location"], "-30.748900, 121.465800");
    assert!(created["resolution_time"].is_null());

    let req = test::TestRequest::post()
        .uri("/api/emergencies")
        .insert_header((AUTHORIZATION, auth))
        .set_json(&report)
        .to_request();
    let dup = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(dup["duplicate"], true);
    assert_eq!(dup["message"], "Emergency already exists");
    assert_eq!(dup["emergency"]["id"], created["id"]);
}

#[actix_web::test]
async fn zero_coordinates_skip_geocoding() {
    let state = test_state().await;
    let db = require_db(&state).unwrap();
    let sup = create_supervisor(db, "Sam").await;
    let miner = create_miner(db, &sup, "Max").await;
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::post()
        .uri("/api/emergencies")
        .insert_header((AUTHORIZATION, bearer_for(&miner.user_id, Role::Miner)))
        .set_json(json!({ "emergency_id": 1, "severity": "LOW", "issue": "Dust" }))
        .to_request();
    let created = json_with_status(test::call_service(&app, req).await, StatusCode::CREATED).await;
    assert!(created["location"].is_null());
}

#[actix_web::test]
async fn status_lifecycle_and_filtering() {
    let state = test_state().await;
    let db = require_db(&state).unwrap();
    let sup = create_supervisor(db, "Sam").await;
    let miner = create_miner(db, &sup, "Max").await;
    let app = create_test_app(state).build().await;
    let miner_auth = bearer_for(&miner.user_id, Role::Miner);
    let sup_auth = bearer_for(&sup.user_id, Role::Supervisor);

    let mut ids = Vec::new();
    for emergency_id in [10, 11] {
        let req = test::TestRequest::post()
            .uri("/api/emergencies")
            .insert_header((AUTHORIZATION, miner_auth.clone()))
            .set_json(json!({ "emergency_id": emergency_id, "severity": "MEDIUM", "issue": "Gas" }))
            .to_request();
        let created =
            json_with_status(test::call_service(&app, req).await, StatusCode::CREATED).await;
        ids.push(created["id"].as_i64().unwrap());
    }

    let req = test::TestRequest::put()
        .uri(&format!("/api/emergencies/{}/status", ids[0]))
        .insert_header((AUTHORIZATION, sup_auth.clone()))
        .set_json(json!({ "status": "RESOLVED" }))
        .to_request();
    let body = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(body["status"], "RESOLVED");

    let req = test::TestRequest::get()
        .uri(&format!("/api/emergencies/{}", ids[0]))
        .insert_header((AUTHORIZATION, sup_auth.clone()))
        .to_request();
    let resolved = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
    assert!(resolved["resolution_time"].is_string());
    assert_eq!(resolved["user_name"], "Max");

    let req = test::TestRequest::get()
        .uri("/api/emergencies?status=pending")
        .insert_header((AUTHORIZATION, sup_auth.clone()))
        .to_request();
    let pending = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
    let pending = pending.as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["id"], ids[1]);

    let req = test::TestRequest::get()
        .uri("/api/emergencies")
        .insert_header((AUTHORIZATION, sup_auth.clone()))
        .to_request();
    let all = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(all[0]["id"], ids[1], "newest first");

    let req = test::TestRequest::get()
        .uri("/api/emergencies?status=DONE")
        .insert_header((AUTHORIZATION, sup_auth))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn media_update_and_missing_report() {
    let state = test_state().await;
    let db = require_db(&state).unwrap();
    let sup = create_supervisor(db, "Sam").await;
    let miner = create_miner(db, &sup, "Max").await;
    let app = create_test_app(state).build().await;
    let auth = bearer_for(&miner.user_id, Role::Miner);

    let req = test::TestRequest::post()
        .uri("/api/emergencies")
        .insert_header((AUTHORIZATION, auth.clone()))
        .set_json(json!({ "emergency_id": 3, "media_status": "PENDING_UPLOAD" }))
        .to_request();
    let created = json_with_status(test::call_service(&app, req).await, StatusCode::CREATED).await;
    assert_eq!(created["media_status"], "PENDING_UPLOAD");
    let id = created["id"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/emergencies/{id}/media"))
        .insert_header((AUTHORIZATION, auth.clone()))
        .set_json(json!({ "media_url": "https://media.minesafe.test/3.jpg", "media_status": "SYNCED" }))
        .to_request();
    let body = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(body["message"], "Media updated successfully");

    let req = test::TestRequest::get()
        .uri(&format!("/api/emergencies/{id}"))
        .insert_header((AUTHORIZATION, auth.clone()))
        .to_request();
    let updated = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(updated["media_status"], "SYNCED");
    assert_eq!(updated["media_url"], "https://media.minesafe.test/3.jpg");

    let req = test::TestRequest::put()
        .uri("/api/emergencies/424242/status")
        .insert_header((AUTHORIZATION, auth))
        .set_json(json!({ "status": "RESOLVING" }))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::NOT_FOUND,
        "EMERGENCY_NOT_FOUND",
        "Emergency not found",
    )
    .await;
}
