//! Typed path segments. Malformed values are 400s rather than actix's
//! default 404 for a path that fails to deserialize.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::services::checklists::ChecklistKind;

/// Numeric `{id}` segment; must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub i64);

fn parse_record_id(raw: Option<&str>) -> Result<RecordId, AppError> {
    let raw = raw.ok_or_else(|| {
        AppError::bad_request(ErrorCode::InvalidPathParam, "Missing id parameter")
    })?;
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(RecordId(id)),
        _ => Err(AppError::bad_request(
            ErrorCode::InvalidPathParam,
            format!("Invalid id: {raw}"),
        )),
    }
}

impl FromRequest for RecordId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(parse_record_id(req.match_info().get("id")))
    }
}

/// `{user_id}` segment, e.g. a miner or supervisor id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdParam(pub String);

impl FromRequest for UserIdParam {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.match_info()
                .get("user_id")
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| UserIdParam(s.to_string()))
                .ok_or_else(|| {
                    AppError::bad_request(ErrorCode::InvalidPathParam, "Missing user id")
                }),
        )
    }
}

impl FromRequest for ChecklistKind {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(req.match_info().get("kind").unwrap_or_default().parse())
    }
}
