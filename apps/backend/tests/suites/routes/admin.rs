use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::test;
use minesafe_backend::auth::Role;
use minesafe_backend::db::require_db;
use serde_json::json;

use crate::common::{assert_problem, json_with_status};
use crate::support::factory::create_admin;
use crate::support::{bearer_for, create_test_app, test_state};

#[actix_web::test]
async fn admin_manages_supervisors() {
    let state = test_state().await;
    let admin = create_admin(require_db(&state).unwrap()).await;
    let app = create_test_app(state).build().await;
    let auth = bearer_for(&admin.user_id, Role::Admin);

    let req = test::TestRequest::post()
        .uri("/api/admin/supervisors")
        .insert_header((AUTHORIZATION, auth.clone()))
        .set_json(json!({
            "name": "Ruth",
            "email": "ruth@minesafe.test",
            "password": "pw123456",
            "department": "Processing"
        }))
        .to_request();
    let created = json_with_status(test::call_service(&app, req).await, StatusCode::CREATED).await;
    assert_eq!(created["success"], true);
    assert_eq!(created["message"], "Supervisor added successfully");
    let id = created["supervisor_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/admin/supervisors")
        .insert_header((AUTHORIZATION, auth.clone()))
        .to_request();
    let list = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
    let rows = list["supervisors"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["department"], "Processing");
    assert_eq!(rows[0]["status"], "active");

    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/supervisors/{id}"))
        .insert_header((AUTHORIZATION, auth.clone()))
        .set_json(json!({ "phone": "0400 999 999" }))
        .to_request();
    let updated = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(updated["phone"], "0400 999 999");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/supervisors/{id}"))
        .insert_header((AUTHORIZATION, auth.clone()))
        .to_request();
    let deleted = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(deleted["message"], "Supervisor deleted successfully");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/supervisors/{id}"))
        .insert_header((AUTHORIZATION, auth))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::NOT_FOUND,
        "SUPERVISOR_NOT_FOUND",
        "Supervisor not found",
    )
    .await;
}
