//! Idempotent startup data: the configured administrator and the default
//! checklist items.

use sea_orm::ConnectionTrait;
use tracing::info;

use crate::auth::password::hash_password;
use crate::auth::Role;
use crate::config::app::AdminBootstrap;
use crate::error::AppError;
use crate::logging::pii::RedactedEmail;
use crate::repos::checklists;
use crate::repos::users::{self, UserCreate};
use crate::services::checklists::ChecklistKind;
use crate::state::SecurityConfig;

/// Create the administrator account unless the email is already taken.
/// Returns `true` when a new account was created.
pub async fn ensure_admin<C: ConnectionTrait>(
    conn: &C,
    admin: &AdminBootstrap,
    security: &SecurityConfig,
) -> Result<bool, AppError> {
    if let Some(existing) = users::find_by_email(conn, &admin.email).await? {
        if existing.role != Role::Admin.as_str() {
            return Err(AppError::config(format!(
                "ADMIN_EMAIL belongs to an existing {} account",
                existing.role
            )));
        }
        return Ok(false);
    }

    let password_hash = hash_password(admin.password.clone(), security.password_cost).await?;
    let user = users::create_user(
        conn,
        UserCreate {
            role: Role::Admin,
            name: "Administrator".to_string(),
            email: admin.email.clone(),
            phone: String::new(),
            password_hash,
            mining_site: String::new(),
            location: String::new(),
            supervisor_id: None,
        },
    )
    .await?;

    info!(user_id = %user.user_id, email = %RedactedEmail(&user.email), "administrator account created");
    Ok(true)
}

/// Insert the built-in items for each checklist kind that has none yet.
/// Returns how many items were inserted.
pub async fn seed_checklist_defaults<C: ConnectionTrait>(conn: &C) -> Result<usize, AppError> {
    let mut inserted = 0;
    for kind in ChecklistKind::ALL {
        if checklists::count_defaults(conn, kind.as_str()).await? > 0 {
            continue;
        }
        for (title, description) in kind.defaults() {
            checklists::create_item(
                conn,
                kind.as_str(),
                None,
                (*title).to_string(),
                (*description).to_string(),
                true,
            )
            .await?;
            inserted += 1;
        }
    }
    if inserted > 0 {
        info!(inserted, "default checklist items seeded");
    }
    Ok(inserted)
}
