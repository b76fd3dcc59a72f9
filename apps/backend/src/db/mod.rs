use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::state::app_state::AppState;

/// Borrow the database connection, or fail with 503 when none is configured.
pub fn require_db(state: &AppState) -> Result<&DatabaseConnection, AppError> {
    state
        .db()
        .ok_or_else(|| AppError::db_unavailable("database connection not configured"))
}
