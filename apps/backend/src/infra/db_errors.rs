//! `sea_orm::DbErr` to `AppError` translation.
//!
//! Unique violations on known constraints become 409s with a user-facing
//! message; everything else is logged with the trace id and surfaced as a
//! generic server error.

use tracing::{error, warn};

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::trace_ctx;

const SQLITE_UNIQUE: &str = "UNIQUE constraint failed: ";

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// First `table.column` from a SQLite "UNIQUE constraint failed: a.b, a.c" message.
fn extract_sqlite_table_column(error_msg: &str) -> Option<&str> {
    let start = error_msg.find(SQLITE_UNIQUE)? + SQLITE_UNIQUE.len();
    error_msg[start..]
        .split(|c: char| c == ',' || c.is_whitespace())
        .find(|s| !s.is_empty())
}

fn conflict_for_sqlite_column(table_column: &str) -> Option<(ErrorCode, &'static str)> {
    match table_column {
        "users.email" => Some((ErrorCode::EmailAlreadyRegistered, "Email already registered")),
        "emergencies.user_id" => Some((ErrorCode::Conflict, "Emergency already exists")),
        "star_videos.supervisor_id" => {
            Some((ErrorCode::Conflict, "Star video already set for today"))
        }
        _ => None,
    }
}

fn conflict_for_postgres_constraint(error_msg: &str) -> Option<(ErrorCode, &'static str)> {
    if error_msg.contains("users_email_key") {
        return Some((ErrorCode::EmailAlreadyRegistered, "Email already registered"));
    }
    if error_msg.contains("ux_emergencies_user_emergency") {
        return Some((ErrorCode::Conflict, "Emergency already exists"));
    }
    if error_msg.contains("ux_star_videos_supervisor_date") {
        return Some((ErrorCode::Conflict, "Star video already set for today"));
    }
    None
}

pub fn is_unique_violation(error_msg: &str) -> bool {
    mentions_sqlstate(error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains(SQLITE_UNIQUE)
}

pub fn map_db_err(e: sea_orm::DbErr) -> AppError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(what) => {
            return AppError::not_found(ErrorCode::NotFound, format!("{what} not found"));
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, error = %error_msg, "database unavailable");
            return AppError::db_unavailable(error_msg);
        }
        _ => {}
    }

    if is_unique_violation(&error_msg) {
        warn!(trace_id = %trace_id, error = %error_msg, "unique constraint violation");

        let known = extract_sqlite_table_column(&error_msg)
            .and_then(conflict_for_sqlite_column)
            .or_else(|| conflict_for_postgres_constraint(&error_msg));

        return match known {
            Some((code, detail)) => AppError::conflict(code, detail),
            None => AppError::conflict(ErrorCode::Conflict, "Resource already exists"),
        };
    }

    if mentions_sqlstate(&error_msg, "23503") || error_msg.contains("FOREIGN KEY constraint failed")
    {
        warn!(trace_id = %trace_id, error = %error_msg, "foreign key violation");
        return AppError::invalid(
            ErrorCode::ValidationError,
            "Referenced resource does not exist",
        );
    }

    error!(trace_id = %trace_id, error = %error_msg, "unhandled database error");
    AppError::db(error_msg)
}
