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
async fn supervisor_creates_miner_inheriting_site() {
    let state = test_state().await;
    let sup = create_supervisor(require_db(&state).unwrap(), "Sam").await;
    let app = create_test_app(state).build().await;
    let auth = bearer_for(&sup.user_id, Role::Supervisor);

    let req = test::TestRequest::post()
        .uri("/api/miners")
        .insert_header((AUTHORIZATION, auth.clone()))
        .set_json(json!({
            "name": "Max",
            "email": "max@minesafe.test",
            "phone_number": "0400 111 222",
            "password": "secret1"
        }))
        .to_request();
    let created = json_with_status(test::call_service(&app, req).await, StatusCode::CREATED).await;

    assert_eq!(created["role"], "MINER");
    assert_eq!(created["supervisor_id"], sup.user_id.as_str());
    assert_eq!(created["mining_site"], "North Pit");
    assert_eq!(created["location"], "Kalgoorlie");
    assert_eq!(created["phone"], "0400 111 222");
    assert!(created.get("password").is_none());

    let req = test::TestRequest::get()
        .uri("/api/miners")
        .insert_header((AUTHORIZATION, auth))
        .to_request();
    let list = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["email"], "max@minesafe.test");
}

#[actix_web::test]
async fn supervisors_only_see_their_own_miners() {
    let state = test_state().await;
    let db = require_db(&state).unwrap();
    let sam = create_supervisor(db, "Sam").await;
    let kim = create_supervisor(db, "Kim").await;
    let kims_miner = create_miner(db, &kim, "Kai").await;
    let app = create_test_app(state).build().await;
    let auth = bearer_for(&sam.user_id, Role::Supervisor);

    let req = test::TestRequest::get()
        .uri(&format!("/api/miners/{}", kims_miner.user_id))
        .insert_header((AUTHORIZATION, auth.clone()))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::NOT_FOUND,
        "MINER_NOT_FOUND",
        "Miner not found",
    )
    .await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/miners/{}", kims_miner.user_id))
        .insert_header((AUTHORIZATION, auth))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn update_then_delete_miner() {
    let state = test_state().await;
    let db = require_db(&state).unwrap();
    let sup = create_supervisor(db, "Sam").await;
    let miner = create_miner(db, &sup, "Max").await;
    let app = create_test_app(state).build().await;
    let auth = bearer_for(&sup.user_id, Role::Supervisor);
    let uri = format!("/api/miners/{}", miner.user_id);

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header((AUTHORIZATION, auth.clone()))
        .set_json(json!({ "name": "Maxine" }))
        .to_request();
    let updated = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(updated["name"], "Maxine");
    assert_eq!(updated["email"], miner.email.as_str());

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header((AUTHORIZATION, auth.clone()))
        .to_request();
    let body = json_with_status(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(body["message"], "Miner deleted successfully");

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header((AUTHORIZATION, auth))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn duplicate_miner_email_conflicts() {
    let state = test_state().await;
    let db = require_db(&state).unwrap();
    let sup = create_supervisor(db, "Sam").await;
    let miner = create_miner(db, &sup, "Max").await;
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::post()
        .uri("/api/miners")
        .insert_header((AUTHORIZATION, bearer_for(&sup.user_id, Role::Supervisor)))
        .set_json(json!({ "name": "Other", "email": miner.email, "password": "x" }))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::CONFLICT,
        "EMAIL_ALREADY_REGISTERED",
        "Email already registered",
    )
    .await;
}
