//! Database fixtures built through the repository layer.

use backend_test_support::unique_helpers::unique_email;
use minesafe_backend::auth::password::hash_password;
use minesafe_backend::auth::Role;
use minesafe_backend::repos::modules::{self, VideoModuleCreate};
use minesafe_backend::repos::users::{self, User, UserCreate};
use sea_orm::ConnectionTrait;

pub const TEST_PASSWORD: &str = "password123";

async fn create_user<C: ConnectionTrait>(
    conn: &C,
    role: Role,
    name: &str,
    email: String,
    supervisor_id: Option<String>,
) -> User {
    let password_hash = hash_password(TEST_PASSWORD.to_string(), 4)
        .await
        .expect("hash password");
    users::create_user(
        conn,
        UserCreate {
            role,
            name: name.to_string(),
            email,
            phone: "0400 000 000".to_string(),
            password_hash,
            mining_site: "North Pit".to_string(),
            location: "Kalgoorlie".to_string(),
            supervisor_id,
        },
    )
    .await
    .expect("create user")
}

pub async fn create_supervisor<C: ConnectionTrait>(conn: &C, name: &str) -> User {
    create_user(conn, Role::Supervisor, name, unique_email("sup"), None).await
}

pub async fn create_miner<C: ConnectionTrait>(conn: &C, supervisor: &User, name: &str) -> User {
    create_user(
        conn,
        Role::Miner,
        name,
        unique_email("miner"),
        Some(supervisor.user_id.clone()),
    )
    .await
}

/// A miner with no supervisor on record.
pub async fn create_unassigned_miner<C: ConnectionTrait>(conn: &C, name: &str) -> User {
    create_user(conn, Role::Miner, name, unique_email("miner"), None).await
}

pub async fn create_admin<C: ConnectionTrait>(conn: &C) -> User {
    create_user(conn, Role::Admin, "Admin", unique_email("admin"), None).await
}

/// Active module with `answers.len()` two-option questions; `answers`
/// gives the correct option index for each.
pub async fn create_module_with_quiz<C: ConnectionTrait>(
    conn: &C,
    supervisor: &User,
    title: &str,
    answers: &[i32],
) -> i64 {
    let module = modules::create_module(
        conn,
        VideoModuleCreate {
            title: title.to_string(),
            description: format!("{title} walkthrough"),
            video_url: "https://videos.minesafe.test/m.mp4".to_string(),
            duration: 300,
            category: "Safety".to_string(),
            thumbnail: String::new(),
            created_by: Some(supervisor.user_id.clone()),
        },
    )
    .await
    .expect("create module");

    for (i, answer) in answers.iter().enumerate() {
        modules::create_question(
            conn,
            module.id,
            format!("Question {}", i + 1),
            r#"["Yes","No"]"#.to_string(),
            *answer,
        )
        .await
        .expect("create question");
    }
    module.id
}
