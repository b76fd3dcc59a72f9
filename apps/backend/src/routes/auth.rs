//! Public login and signup endpoints.

use actix_web::{web, HttpResponse};

use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::services::auth::{self, AppLoginRequest, LoginRequest, SignupRequest};
use crate::state::app_state::AppState;

/// POST /api/auth/signup
///
/// Registers a supervisor account and returns a token for it.
async fn signup(
    body: ValidatedJson<SignupRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let response = auth::signup(db, &app_state.security, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

/// POST /api/auth/login
async fn login(
    body: ValidatedJson<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let response = auth::login(db, &app_state.security, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// POST /api/app/miner/login
///
/// Mobile app login; the declared role must match the account.
async fn app_login(
    body: ValidatedJson<AppLoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let response = auth::app_login(db, &app_state.security, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/auth/signup").route(web::post().to(signup)))
        .service(web::resource("/api/auth/login").route(web::post().to(login)))
        .service(web::resource("/api/app/miner/login").route(web::post().to(app_login)));
}
