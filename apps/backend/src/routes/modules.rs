//! Training modules, quizzes and the daily star module.
//!
//! Mounted behind `Authenticate`; the authoring endpoints add a
//! supervisor gate per route.

use actix_web::{web, HttpResponse};
use time::OffsetDateTime;

use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::{AuthIdentity, RecordId, ValidatedJson};
use crate::middleware::RequireRole;
use crate::services::modules::{
    self, ModuleCreateRequest, QuestionCreateRequest, SubmitAnswersRequest,
};
use crate::state::app_state::AppState;

async fn list(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    Ok(HttpResponse::Ok().json(modules::list_modules(db).await?))
}

async fn create(
    caller: AuthIdentity,
    body: ValidatedJson<ModuleCreateRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let module = modules::create_module(db, &caller.subject_id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(module))
}

async fn get(id: RecordId, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    Ok(HttpResponse::Ok().json(modules::get_module(db, id.0).await?))
}

/// GET /api/modules/star
///
/// Today's star module for the caller's supervisor.
async fn star(
    caller: AuthIdentity,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let module = modules::get_star(db, &caller, OffsetDateTime::now_utc()).await?;
    Ok(HttpResponse::Ok().json(module))
}

async fn set_star(
    caller: AuthIdentity,
    id: RecordId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let set = modules::set_star(db, &caller.subject_id, id.0, OffsetDateTime::now_utc()).await?;
    Ok(HttpResponse::Ok().json(set))
}

async fn questions(id: RecordId, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    Ok(HttpResponse::Ok().json(modules::get_questions(db, id.0).await?))
}

async fn create_question(
    body: ValidatedJson<QuestionCreateRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let question = modules::create_question(db, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(question))
}

/// POST /api/modules/submit
async fn submit(
    caller: AuthIdentity,
    body: ValidatedJson<SubmitAnswersRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let result = modules::submit_answers(
        db,
        &caller.subject_id,
        body.into_inner(),
        OffsetDateTime::now_utc(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(result))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Literal segments before `/{id}`.
    cfg.service(
        web::resource("")
            .route(web::get().to(list))
            .route(web::post().to(create).wrap(RequireRole::supervisor())),
    )
    .service(web::resource("/star").route(web::get().to(star)))
    .service(web::resource("/submit").route(web::post().to(submit)))
    .service(
        web::resource("/questions")
            .route(web::post().to(create_question).wrap(RequireRole::supervisor())),
    )
    .service(web::resource("/{id}").route(web::get().to(get)))
    .service(web::resource("/{id}/questions").route(web::get().to(questions)))
    .service(
        web::resource("/{id}/star")
            .route(web::post().to(set_star).wrap(RequireRole::supervisor())),
    );
}
