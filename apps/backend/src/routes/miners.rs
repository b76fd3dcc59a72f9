//! Supervisor management of their own miners. Mounted behind
//! `Authenticate` and `RequireRole::supervisor()`.

use actix_web::{web, HttpResponse};

use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::{AuthIdentity, UserIdParam, ValidatedJson};
use crate::services::miners::{self, MinerCreateRequest, MinerUpdateRequest};
use crate::state::app_state::AppState;

async fn create(
    caller: AuthIdentity,
    body: ValidatedJson<MinerCreateRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let miner =
        miners::create_miner(db, &app_state.security, &caller.subject_id, body.into_inner())
            .await?;
    Ok(HttpResponse::Created().json(miner))
}

async fn list(
    caller: AuthIdentity,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    Ok(HttpResponse::Ok().json(miners::list_miners(db, &caller.subject_id).await?))
}

async fn get(
    caller: AuthIdentity,
    miner_id: UserIdParam,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let miner = miners::get_miner(db, &caller.subject_id, &miner_id.0).await?;
    Ok(HttpResponse::Ok().json(miner))
}

async fn update(
    caller: AuthIdentity,
    miner_id: UserIdParam,
    body: ValidatedJson<MinerUpdateRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let miner =
        miners::update_miner(db, &caller.subject_id, &miner_id.0, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(miner))
}

async fn delete(
    caller: AuthIdentity,
    miner_id: UserIdParam,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let message = miners::delete_miner(db, &caller.subject_id, &miner_id.0).await?;
    Ok(HttpResponse::Ok().json(message))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list))
            .route(web::post().to(create)),
    )
    .service(
        web::resource("/{user_id}")
            .route(web::get().to(get))
            .route(web::put().to(update))
            .route(web::delete().to(delete)),
    );
}
