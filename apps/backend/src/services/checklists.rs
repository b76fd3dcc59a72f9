//! Daily pre-start and PPE checklists.
//!
//! Each supervisor sees the built-in defaults plus their own items; miners
//! see their supervisor's list. Completion is tracked per user per UTC day.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::info;

use crate::auth::Role;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::Identity;
use crate::repos::checklists::{self, ChecklistItem};
use crate::repos::users;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChecklistKind {
    PreStart,
    Ppe,
}

impl ChecklistKind {
    pub const ALL: [ChecklistKind; 2] = [ChecklistKind::PreStart, ChecklistKind::Ppe];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ChecklistKind::PreStart => "pre-start",
            ChecklistKind::Ppe => "ppe",
        }
    }

    /// Items every supervisor starts with.
    pub const fn defaults(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            ChecklistKind::PreStart => &[
                (
                    "Vehicle Inspection",
                    "Check all vehicle fluids, lights, brakes, and tires before operation",
                ),
                (
                    "Communication Check",
                    "Verify radio and communication equipment is functioning properly",
                ),
                (
                    "Work Area Assessment",
                    "Inspect work area for hazards, obstacles, and safe access routes",
                ),
            ],
            ChecklistKind::Ppe => &[
                (
                    "Hard Hat",
                    "Ensure hard hat is worn and in good condition with no cracks or damage",
                ),
                (
                    "Safety Boots",
                    "Steel-toe safety boots must be worn at all times in operational areas",
                ),
                (
                    "High-Visibility Vest",
                    "High-visibility reflective vest must be worn for visibility",
                ),
            ],
        }
    }
}

impl FromStr for ChecklistKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pre-start" => Ok(ChecklistKind::PreStart),
            "ppe" => Ok(ChecklistKind::Ppe),
            _ => Err(AppError::bad_request(
                ErrorCode::InvalidChecklistKind,
                "Checklist must be 'pre-start' or 'ppe'",
            )),
        }
    }
}

impl fmt::Display for ChecklistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ItemCreateRequest {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct CompletionUpdateRequest {
    pub item_id: i64,
    pub is_completed: bool,
}

#[derive(Debug, Serialize)]
pub struct ItemView {
    pub id: i64,
    pub kind: String,
    pub supervisor_id: Option<String>,
    pub title: String,
    pub description: String,
    pub is_default: bool,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<ChecklistItem> for ItemView {
    fn from(i: ChecklistItem) -> Self {
        Self {
            id: i.id,
            kind: i.kind,
            supervisor_id: i.supervisor_id,
            title: i.title,
            description: i.description,
            is_default: i.is_default,
            is_active: i.is_active,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ItemWithStatus {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

/// Whose item list applies to the caller.
async fn owning_supervisor<C: ConnectionTrait>(
    conn: &C,
    caller: &Identity,
) -> Result<String, AppError> {
    if caller.role == Role::Supervisor {
        return Ok(caller.subject_id.clone());
    }
    users::find_by_user_id(conn, &caller.subject_id)
        .await?
        .and_then(|u| u.supervisor_id)
        .ok_or_else(|| {
            AppError::bad_request(
                ErrorCode::MinerNotAssigned,
                "User is not assigned to a supervisor",
            )
        })
}

/// Today's checklist for the caller with completion flags.
pub async fn todays_checklist<C: ConnectionTrait>(
    conn: &C,
    kind: ChecklistKind,
    caller: &Identity,
    now: OffsetDateTime,
) -> Result<Vec<ItemWithStatus>, AppError> {
    let supervisor_id = owning_supervisor(conn, caller).await?;
    let items = checklists::visible_items(conn, kind.as_str(), &supervisor_id).await?;
    let done: HashMap<i64, _> = checklists::completions_for_day(conn, &caller.subject_id, now.date())
        .await?
        .into_iter()
        .map(|c| (c.item_id, c))
        .collect();

    Ok(items
        .into_iter()
        .map(|item| {
            let completion = done.get(&item.id);
            ItemWithStatus {
                id: item.id,
                title: item.title,
                description: item.description,
                is_completed: completion.is_some_and(|c| c.is_completed),
                completed_at: completion.map(|c| c.completed_at),
            }
        })
        .collect())
}

pub async fn set_completion<C: ConnectionTrait>(
    conn: &C,
    kind: ChecklistKind,
    caller: &Identity,
    req: CompletionUpdateRequest,
    now: OffsetDateTime,
) -> Result<Message, AppError> {
    let item = checklists::find_item(conn, kind.as_str(), req.item_id)
        .await?
        .filter(|i| i.is_active)
        .ok_or_else(|| {
            AppError::not_found(ErrorCode::ChecklistItemNotFound, "Checklist item not found")
        })?;

    checklists::set_completion(conn, &caller.subject_id, item.id, req.is_completed, now).await?;
    Ok(Message {
        message: "Completion updated successfully",
    })
}

/// Management view for a supervisor: defaults plus own active items.
pub async fn list_items<C: ConnectionTrait>(
    conn: &C,
    kind: ChecklistKind,
    supervisor_id: &str,
) -> Result<Vec<ItemView>, AppError> {
    let items = checklists::visible_items(conn, kind.as_str(), supervisor_id).await?;
    Ok(items.into_iter().map(ItemView::from).collect())
}

pub async fn create_item<C: ConnectionTrait>(
    conn: &C,
    kind: ChecklistKind,
    supervisor_id: &str,
    req: ItemCreateRequest,
) -> Result<ItemView, AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::invalid(
            ErrorCode::ValidationError,
            "Title is required",
        ));
    }
    let item = checklists::create_item(
        conn,
        kind.as_str(),
        Some(supervisor_id.to_string()),
        req.title.trim().to_string(),
        req.description,
        false,
    )
    .await?;

    info!(item_id = item.id, kind = %kind, supervisor_id, "checklist item created");
    Ok(item.into())
}

/// Deactivate one of the supervisor's own items. Defaults cannot be removed.
pub async fn delete_item<C: ConnectionTrait>(
    conn: &C,
    kind: ChecklistKind,
    supervisor_id: &str,
    item_id: i64,
) -> Result<Message, AppError> {
    let item = checklists::find_item(conn, kind.as_str(), item_id)
        .await?
        .filter(|i| i.is_active && !i.is_default)
        .filter(|i| i.supervisor_id.as_deref() == Some(supervisor_id))
        .ok_or_else(|| {
            AppError::not_found(
                ErrorCode::ChecklistItemNotFound,
                "Item not found or cannot be deleted",
            )
        })?;

    checklists::deactivate_item(conn, item).await?;
    Ok(Message {
        message: "Item deleted successfully",
    })
}
