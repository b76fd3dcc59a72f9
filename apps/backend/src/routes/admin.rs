//! Administrator management of supervisor accounts. Mounted behind
//! `Authenticate` and `RequireRole::admin()`.

use actix_web::{web, HttpResponse};

use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::{UserIdParam, ValidatedJson};
use crate::services::supervisors::{self, SupervisorCreateRequest, SupervisorUpdateRequest};
use crate::state::app_state::AppState;

async fn list(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    Ok(HttpResponse::Ok().json(supervisors::list_supervisors(db).await?))
}

async fn create(
    body: ValidatedJson<SupervisorCreateRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let created =
        supervisors::create_supervisor(db, &app_state.security, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

async fn get(
    supervisor_id: UserIdParam,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    Ok(HttpResponse::Ok().json(supervisors::get_supervisor(db, &supervisor_id.0).await?))
}

async fn update(
    supervisor_id: UserIdParam,
    body: ValidatedJson<SupervisorUpdateRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let updated =
        supervisors::update_supervisor(db, &supervisor_id.0, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}

async fn delete(
    supervisor_id: UserIdParam,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    Ok(HttpResponse::Ok().json(supervisors::delete_supervisor(db, &supervisor_id.0).await?))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/supervisors")
            .route(web::get().to(list))
            .route(web::post().to(create)),
    )
    .service(
        web::resource("/supervisors/{user_id}")
            .route(web::get().to(get))
            .route(web::put().to(update))
            .route(web::delete().to(delete)),
    );
}
