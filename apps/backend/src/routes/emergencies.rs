//! Emergency reports from the field app.

use actix_web::{web, HttpResponse};
use time::OffsetDateTime;

use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::{AuthIdentity, RecordId, ValidatedJson};
use crate::services::emergencies::{
    self, DuplicateReport, EmergencyCreateRequest, EmergencyQuery, MediaUpdateRequest, Reported,
    StatusUpdateRequest,
};
use crate::state::app_state::AppState;

/// POST /api/emergencies
///
/// 201 with the new report, or 200 with the stored one when the client
/// resends a report it already delivered.
async fn report(
    caller: AuthIdentity,
    body: ValidatedJson<EmergencyCreateRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let outcome =
        emergencies::report(db, app_state.geocoder.as_ref(), &caller, body.into_inner()).await?;
    Ok(match outcome {
        Reported::Created(view) => HttpResponse::Created().json(view),
        Reported::Duplicate(view) => HttpResponse::Ok().json(DuplicateReport::new(view)),
    })
}

async fn list(
    query: web::Query<EmergencyQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    Ok(HttpResponse::Ok().json(emergencies::list(db, query.into_inner()).await?))
}

async fn get(id: RecordId, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    Ok(HttpResponse::Ok().json(emergencies::get(db, id.0).await?))
}

async fn update_media(
    id: RecordId,
    body: ValidatedJson<MediaUpdateRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let updated = emergencies::update_media(db, id.0, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}

async fn update_status(
    id: RecordId,
    body: ValidatedJson<StatusUpdateRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let updated =
        emergencies::update_status(db, id.0, body.into_inner(), OffsetDateTime::now_utc()).await?;
    Ok(HttpResponse::Ok().json(updated))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list))
            .route(web::post().to(report)),
    )
    .service(web::resource("/{id}").route(web::get().to(get)))
    .service(web::resource("/{id}/media").route(web::put().to(update_media)))
    .service(web::resource("/{id}/status").route(web::put().to(update_status)));
}
