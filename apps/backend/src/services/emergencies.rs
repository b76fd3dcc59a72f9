//! Emergency incident reports.
//!
//! Clients may retry a report while offline; `(user_id, emergency_id)`
//! identifies the report, and a repeat returns the stored row.

use std::str::FromStr;

use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::Identity;
use crate::repos::emergencies::{self, Emergency, EmergencyCreate, EmergencyFilter};
use crate::repos::users;
use crate::services::geocode::Geocoder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaStatus {
    Synced,
    PendingUpload,
    NotApplicable,
    UploadFailed,
}

impl MediaStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MediaStatus::Synced => "SYNCED",
            MediaStatus::PendingUpload => "PENDING_UPLOAD",
            MediaStatus::NotApplicable => "NOT_APPLICABLE",
            MediaStatus::UploadFailed => "UPLOAD_FAILED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolutionStatus {
    Pending,
    Resolving,
    Resolved,
    Cancelled,
}

impl ResolutionStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ResolutionStatus::Pending => "PENDING",
            ResolutionStatus::Resolving => "RESOLVING",
            ResolutionStatus::Resolved => "RESOLVED",
            ResolutionStatus::Cancelled => "CANCELLED",
        }
    }
}

impl FromStr for ResolutionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "RESOLVING" => Ok(Self::Resolving),
            "RESOLVED" => Ok(Self::Resolved),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(AppError::invalid(
                ErrorCode::ValidationError,
                format!("Unknown emergency status '{s}'"),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EmergencyCreateRequest {
    /// Defaults to the caller.
    #[serde(default)]
    pub user_id: Option<String>,
    pub emergency_id: i64,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub media_status: Option<MediaStatus>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub incident_time: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct MediaUpdateRequest {
    #[serde(default)]
    pub media_url: Option<String>,
    pub media_status: MediaStatus,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: ResolutionStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct EmergencyQuery {
    pub status: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EmergencyView {
    pub id: i64,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub emergency_id: i64,
    pub severity: String,
    pub latitude: f64,
    pub longitude: f64,
    pub issue: String,
    pub media_status: String,
    pub media_url: Option<String>,
    pub location: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub incident_time: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub reporting_time: OffsetDateTime,
    pub status: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub resolution_time: Option<OffsetDateTime>,
}

impl EmergencyView {
    fn new(e: Emergency, user_name: Option<String>) -> Self {
        Self {
            id: e.id,
            user_id: e.user_id,
            user_name,
            emergency_id: e.emergency_id,
            severity: e.severity,
            latitude: e.latitude,
            longitude: e.longitude,
            issue: e.issue,
            media_status: e.media_status,
            media_url: e.media_url,
            location: e.location,
            incident_time: e.incident_time,
            reporting_time: e.reporting_time,
            status: e.status,
            resolution_time: e.resolution_time,
        }
    }
}

impl From<Emergency> for EmergencyView {
    fn from(e: Emergency) -> Self {
        Self::new(e, None)
    }
}

/// Outcome of a report: a new row, or the stored one for a repeat.
#[derive(Debug)]
pub enum Reported {
    Created(EmergencyView),
    Duplicate(EmergencyView),
}

#[derive(Debug, Serialize)]
pub struct DuplicateReport {
    pub message: &'static str,
    pub emergency: EmergencyView,
    pub duplicate: bool,
}

impl DuplicateReport {
    pub fn new(emergency: EmergencyView) -> Self {
        Self {
            message: "Emergency already exists",
            emergency,
            duplicate: true,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MediaUpdated {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdated {
    pub message: &'static str,
    pub status: ResolutionStatus,
}

fn emergency_not_found() -> AppError {
    AppError::not_found(ErrorCode::EmergencyNotFound, "Emergency not found")
}

pub async fn report<C: ConnectionTrait>(
    conn: &C,
    geocoder: &dyn Geocoder,
    caller: &Identity,
    req: EmergencyCreateRequest,
) -> Result<Reported, AppError> {
    let user_id = req
        .user_id
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| caller.subject_id.clone());

    if let Some(existing) = emergencies::find_by_client_id(conn, &user_id, req.emergency_id).await?
    {
        info!(id = existing.id, user_id = %user_id, "duplicate emergency report");
        return Ok(Reported::Duplicate(existing.into()));
    }

    let location = if req.latitude != 0.0 && req.longitude != 0.0 {
        match geocoder.reverse(req.latitude, req.longitude).await {
            Ok(label) => Some(label),
            Err(e) => {
                warn!(error = %e, "reverse geocoding failed; storing report without location");
                None
            }
        }
    } else {
        None
    };

    let created = emergencies::create(
        conn,
        EmergencyCreate {
            user_id,
            emergency_id: req.emergency_id,
            severity: req.severity,
            latitude: req.latitude,
            longitude: req.longitude,
            issue: req.issue,
            media_status: req
                .media_status
                .unwrap_or(MediaStatus::NotApplicable)
                .as_str()
                .to_string(),
            location,
            incident_time: req.incident_time,
            status: ResolutionStatus::Pending.as_str().to_string(),
        },
    )
    .await?;

    info!(
        id = created.id,
        user_id = %created.user_id,
        severity = %created.severity,
        "emergency reported"
    );
    Ok(Reported::Created(created.into()))
}

pub async fn list<C: ConnectionTrait>(
    conn: &C,
    query: EmergencyQuery,
) -> Result<Vec<EmergencyView>, AppError> {
    let status = match query.status.filter(|s| !s.trim().is_empty()) {
        Some(s) => Some(s.parse::<ResolutionStatus>()?.as_str().to_string()),
        None => None,
    };
    let rows = emergencies::list(
        conn,
        EmergencyFilter {
            status,
            user_id: query.user_id.filter(|u| !u.trim().is_empty()),
        },
    )
    .await?;

    let mut ids: Vec<String> = rows.iter().map(|e| e.user_id.clone()).collect();
    ids.sort_unstable();
    ids.dedup();
    let names = users::names_by_user_id(conn, ids).await?;

    // Reports from deleted accounts are not listed.
    Ok(rows
        .into_iter()
        .filter_map(|e| {
            let name = names.get(&e.user_id).cloned()?;
            Some(EmergencyView::new(e, Some(name)))
        })
        .collect())
}

pub async fn get<C: ConnectionTrait>(conn: &C, id: i64) -> Result<EmergencyView, AppError> {
    let e = emergencies::find(conn, id)
        .await?
        .ok_or_else(emergency_not_found)?;
    let name = users::find_by_user_id(conn, &e.user_id)
        .await?
        .map(|u| u.name)
        .ok_or_else(emergency_not_found)?;
    Ok(EmergencyView::new(e, Some(name)))
}

pub async fn update_media<C: ConnectionTrait>(
    conn: &C,
    id: i64,
    req: MediaUpdateRequest,
) -> Result<MediaUpdated, AppError> {
    let e = emergencies::find(conn, id)
        .await?
        .ok_or_else(emergency_not_found)?;
    emergencies::update_media(
        conn,
        e,
        req.media_url.filter(|u| !u.is_empty()),
        req.media_status.as_str().to_string(),
    )
    .await?;
    Ok(MediaUpdated {
        message: "Media updated successfully",
    })
}

/// `RESOLVED` stamps the resolution time; any other status clears it.
pub async fn update_status<C: ConnectionTrait>(
    conn: &C,
    id: i64,
    req: StatusUpdateRequest,
    now: OffsetDateTime,
) -> Result<StatusUpdated, AppError> {
    let e = emergencies::find(conn, id)
        .await?
        .ok_or_else(emergency_not_found)?;
    let resolution_time = (req.status == ResolutionStatus::Resolved).then_some(now);
    emergencies::update_status(conn, e, req.status.as_str().to_string(), resolution_time).await?;

    info!(id, status = req.status.as_str(), "emergency status updated");
    Ok(StatusUpdated {
        message: "Emergency status updated successfully",
        status: req.status,
    })
}
