use actix_web::http::StatusCode;
use actix_web::test;
use minesafe_backend::db::require_db;
use serde_json::json;

use crate::common::{assert_problem, json_with_status};
use crate::support::factory::{
    create_miner, create_supervisor, create_unassigned_miner, TEST_PASSWORD,
};
use crate::support::{create_test_app, test_state};

#[actix_web::test]
async fn signup_creates_supervisor_and_rejects_duplicate_email() {
    let app = create_test_app(test_state().await).build().await;
    let payload = json!({
        "name": "Dana",
        "email": "dana@minesafe.test",
        "password": "hunter22",
        "mining_site": "East Ridge"
    });

    let req = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(&payload)
        .to_request();
    let body = json_with_status(test::call_service(&app, req).await, StatusCode::CREATED).await;

    assert_eq!(body["role"], "SUPERVISOR");
    assert_eq!(body["organization_id"], "East Ridge");
    assert!(body["user_id"].as_str().unwrap().starts_with("SUP-"));
    assert!(!body["token"].as_str().unwrap().is_empty());

    let req = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(&payload)
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::CONFLICT,
        "EMAIL_ALREADY_REGISTERED",
        "Email already registered",
    )
    .await;
}

#[actix_web::test]
async fn signup_requires_name_email_and_password() {
    let app = create_test_app(test_state().await).build().await;

    let req = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(json!({ "email": "x@minesafe.test" }))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        "VALIDATION_ERROR",
        "Name, email, and password are required",
    )
    .await;
}

#[actix_web::test]
async fn login_reports_supervisor_name_for_miners() {
    let state = test_state().await;
    let db = require_db(&state).unwrap();
    let sup = create_supervisor(db, "Sam").await;
    let miner = create_miner(db, &sup, "Max").await;
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": miner.email, "password": TEST_PASSWORD }))
        .to_request();
    let body = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;

    assert_eq!(body["role"], "MINER");
    assert_eq!(body["user_id"], miner.user_id.as_str());
    assert_eq!(body["supervisor_name"], "Sam");
}

#[actix_web::test]
async fn login_with_wrong_password_is_unauthorized() {
    let state = test_state().await;
    let sup = create_supervisor(require_db(&state).unwrap(), "Sam").await;
    let app = create_test_app(state).build().await;

    for (email, password) in [
        (sup.email.as_str(), "wrong"),
        ("nobody@minesafe.test", TEST_PASSWORD),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request();
        assert_problem(
            test::call_service(&app, req).await,
            StatusCode::UNAUTHORIZED,
            "INVALID_CREDENTIALS",
            "Invalid email or password",
        )
        .await;
    }
}

#[actix_web::test]
async fn app_login_accepts_operator_alias() {
    let state = test_state().await;
    let db = require_db(&state).unwrap();
    let sup = create_supervisor(db, "Sam").await;
    let miner = create_miner(db, &sup, "Max").await;
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::post()
        .uri("/api/app/miner/login")
        .set_json(json!({ "email": miner.email, "password": TEST_PASSWORD, "role": "OPERATOR" }))
        .to_request();
    let body = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;

    assert_eq!(body["miner_id"], miner.user_id.as_str());
    assert_eq!(body["miner_name"], "Max");
    assert_eq!(body["supervisor_name"], "Sam");
    assert_eq!(body["location"], "North Pit");
}

#[actix_web::test]
async fn app_login_rejects_role_mismatch_and_unknown_role() {
    let state = test_state().await;
    let sup = create_supervisor(require_db(&state).unwrap(), "Sam").await;
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::post()
        .uri("/api/app/miner/login")
        .set_json(json!({ "email": sup.email, "password": TEST_PASSWORD, "role": "MINER" }))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::UNAUTHORIZED,
        "INVALID_CREDENTIALS",
        "Invalid email or password",
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/app/miner/login")
        .set_json(json!({ "email": sup.email, "password": TEST_PASSWORD, "role": "CAPTAIN" }))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        "INVALID_ROLE",
        "Invalid role specified",
    )
    .await;
}

#[actix_web::test]
async fn app_login_requires_assigned_supervisor() {
    let state = test_state().await;
    let miner = create_unassigned_miner(require_db(&state).unwrap(), "Lone").await;
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::post()
        .uri("/api/app/miner/login")
        .set_json(json!({ "email": miner.email, "password": TEST_PASSWORD, "role": "MINER" }))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::CONFLICT,
        "MINER_NOT_ASSIGNED",
        "User is not assigned to a supervisor",
    )
    .await;
}

#[actix_web::test]
async fn malformed_json_is_bad_request() {
    let app = create_test_app(test_state().await).build().await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"email\":")
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        "BAD_REQUEST",
        "Invalid request payload",
    )
    .await;
}
