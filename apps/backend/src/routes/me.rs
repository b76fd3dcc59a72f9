use actix_web::web;

use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::AuthIdentity;
use crate::services::users::{self, UserView};
use crate::state::app_state::AppState;

/// GET /api/me
async fn me(
    caller: AuthIdentity,
    app_state: web::Data<AppState>,
) -> Result<web::Json<UserView>, AppError> {
    let db = require_db(&app_state)?;
    let user = users::get_user(db, &caller.subject_id).await?;
    Ok(web::Json(user.into()))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(me));
}
