use actix_web::web;
use time::OffsetDateTime;

use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::AuthIdentity;
use crate::services::dashboard::{self, DashboardStats};
use crate::state::app_state::AppState;

/// GET /api/dashboard/stats
async fn stats(
    caller: AuthIdentity,
    app_state: web::Data<AppState>,
) -> Result<web::Json<DashboardStats>, AppError> {
    let db = require_db(&app_state)?;
    let stats = dashboard::stats(db, &caller.subject_id, OffsetDateTime::now_utc()).await?;
    Ok(web::Json(stats))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/stats", web::get().to(stats));
}
