use actix_web::{web, HttpResponse};
use time::OffsetDateTime;

use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::AuthIdentity;
use crate::middleware::RequireRole;
use crate::services::streaks;
use crate::state::app_state::AppState;

/// GET /api/streaks
///
/// Learning streaks for every miner of the calling supervisor.
async fn team(
    caller: AuthIdentity,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let rows =
        streaks::learning_streaks(db, &caller.subject_id, OffsetDateTime::now_utc()).await?;
    Ok(HttpResponse::Ok().json(rows))
}

async fn mine(
    caller: AuthIdentity,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let streak = streaks::my_streak(db, &caller.subject_id, OffsetDateTime::now_utc()).await?;
    Ok(HttpResponse::Ok().json(streak))
}

async fn calendar(
    caller: AuthIdentity,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let cal = streaks::calendar(db, &caller.subject_id, OffsetDateTime::now_utc()).await?;
    Ok(HttpResponse::Ok().json(cal))
}

async fn completions(
    caller: AuthIdentity,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    Ok(HttpResponse::Ok().json(streaks::my_completions(db, &caller.subject_id).await?))
}

/// Registered inside the authenticated `/api` scope.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/streaks").route(web::get().to(team).wrap(RequireRole::supervisor())),
    )
    .service(web::resource("/streak/me").route(web::get().to(mine)))
    .service(web::resource("/streak/calendar").route(web::get().to(calendar)))
    .service(web::resource("/completions/me").route(web::get().to(completions)));
}
