//! Daily pre-start and PPE checklists. `{kind}` is `pre-start` or `ppe`.

use actix_web::{web, HttpResponse};
use time::OffsetDateTime;

use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::{AuthIdentity, RecordId, ValidatedJson};
use crate::middleware::RequireRole;
use crate::services::checklists::{self, ChecklistKind, CompletionUpdateRequest, ItemCreateRequest};
use crate::state::app_state::AppState;

async fn today(
    kind: ChecklistKind,
    caller: AuthIdentity,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let items = checklists::todays_checklist(db, kind, &caller, OffsetDateTime::now_utc()).await?;
    Ok(HttpResponse::Ok().json(items))
}

async fn complete(
    kind: ChecklistKind,
    caller: AuthIdentity,
    body: ValidatedJson<CompletionUpdateRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let message = checklists::set_completion(
        db,
        kind,
        &caller,
        body.into_inner(),
        OffsetDateTime::now_utc(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(message))
}

async fn items(
    kind: ChecklistKind,
    caller: AuthIdentity,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    Ok(HttpResponse::Ok().json(checklists::list_items(db, kind, &caller.subject_id).await?))
}

async fn create_item(
    kind: ChecklistKind,
    caller: AuthIdentity,
    body: ValidatedJson<ItemCreateRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let item = checklists::create_item(db, kind, &caller.subject_id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(item))
}

async fn delete_item(
    kind: ChecklistKind,
    id: RecordId,
    caller: AuthIdentity,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let message = checklists::delete_item(db, kind, &caller.subject_id, id.0).await?;
    Ok(HttpResponse::Ok().json(message))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/{kind}").route(web::get().to(today)))
        .service(web::resource("/{kind}/complete").route(web::post().to(complete)))
        .service(
            web::scope("/{kind}/items")
                .wrap(RequireRole::supervisor())
                .service(
                    web::resource("")
                        .route(web::get().to(items))
                        .route(web::post().to(create_item)),
                )
                .service(web::resource("/{id}").route(web::delete().to(delete_item))),
        );
}
