use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::test;
use minesafe_backend::auth::Role;
use minesafe_backend::db::require_db;

use crate::common::{assert_problem, json_with_status};
use crate::support::factory::{create_miner, create_supervisor};
use crate::support::{bearer_for, create_test_app, expired_bearer_for, test_state};

#[actix_web::test]
async fn missing_header_is_rejected_before_the_handler() {
    let app = create_test_app(test_state().await).build().await;

    let req = test::TestRequest::get().uri("/api/miners").to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem(
        resp,
        StatusCode::UNAUTHORIZED,
        "AUTH_HEADER_MISSING",
        "Authorization header required",
    )
    .await;
}

#[actix_web::test]
async fn non_bearer_scheme_is_malformed() {
    let app = create_test_app(test_state().await).build().await;

    for value in ["Basic dXNlcjpwYXNz", "Bearer", "Bearer a b"] {
        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header((AUTHORIZATION, value))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_problem(
            resp,
            StatusCode::UNAUTHORIZED,
            "AUTH_HEADER_MALFORMED",
            "Invalid authorization format",
        )
        .await;
    }
}

#[actix_web::test]
async fn valid_token_with_loose_separator_is_malformed() {
    let state = test_state().await;
    let sup = create_supervisor(require_db(&state).unwrap(), "Sam").await;
    let app = create_test_app(state).build().await;

    let bearer = bearer_for(&sup.user_id, Role::Supervisor);
    let token = bearer.trim_start_matches("Bearer ");

    for value in [format!("Bearer  {token}"), format!("Bearer\t{token}")] {
        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header((AUTHORIZATION, value.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_problem(
            resp,
            StatusCode::UNAUTHORIZED,
            "AUTH_HEADER_MALFORMED",
            "Invalid authorization format",
        )
        .await;
    }

    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header((AUTHORIZATION, bearer.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn expired_token_is_invalid() {
    let state = test_state().await;
    let sup = create_supervisor(require_db(&state).unwrap(), "Sam").await;
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header((AUTHORIZATION, expired_bearer_for(&sup.user_id, Role::Supervisor)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem(
        resp,
        StatusCode::UNAUTHORIZED,
        "INVALID_TOKEN",
        "Invalid or expired token",
    )
    .await;
}

#[actix_web::test]
async fn garbage_token_is_invalid() {
    let app = create_test_app(test_state().await).build().await;

    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header((AUTHORIZATION, "Bearer not.a.jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem(
        resp,
        StatusCode::UNAUTHORIZED,
        "INVALID_TOKEN",
        "Invalid or expired token",
    )
    .await;
}

#[actix_web::test]
async fn miner_is_forbidden_on_supervisor_routes() {
    let state = test_state().await;
    let db = require_db(&state).unwrap();
    let sup = create_supervisor(db, "Sam").await;
    let miner = create_miner(db, &sup, "Max").await;
    let app = create_test_app(state).build().await;

    for uri in ["/api/miners", "/api/dashboard/stats", "/api/streaks"] {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header((AUTHORIZATION, bearer_for(&miner.user_id, Role::Miner)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_problem(
            resp,
            StatusCode::FORBIDDEN,
            "SUPERVISOR_REQUIRED",
            "Supervisor access required",
        )
        .await;
    }
}

#[actix_web::test]
async fn supervisor_is_forbidden_on_admin_routes() {
    let state = test_state().await;
    let sup = create_supervisor(require_db(&state).unwrap(), "Sam").await;
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get()
        .uri("/api/admin/supervisors")
        .insert_header((AUTHORIZATION, bearer_for(&sup.user_id, Role::Supervisor)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem(resp, StatusCode::FORBIDDEN, "ADMIN_REQUIRED", "Admin access required").await;
}

#[actix_web::test]
async fn me_returns_caller_without_password() {
    let state = test_state().await;
    let sup = create_supervisor(require_db(&state).unwrap(), "Sam").await;
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header((AUTHORIZATION, bearer_for(&sup.user_id, Role::Supervisor)))
        .to_request();
    let body = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;

    assert_eq!(body["user_id"], sup.user_id.as_str());
    assert_eq!(body["role"], "SUPERVISOR");
    assert!(body.get("password").is_none());
}

#[actix_web::test]
async fn me_for_deleted_account_is_not_found() {
    let app = create_test_app(test_state().await).build().await;

    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header((AUTHORIZATION, bearer_for("SUP-gone", Role::Supervisor)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem(resp, StatusCode::NOT_FOUND, "USER_NOT_FOUND", "User not found").await;
}

#[actix_web::test]
async fn health_is_public() {
    let app = create_test_app(test_state().await).build().await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "MineSafe Backend");
}
