//! Schema migrations for the MineSafe backend.
//!
//! The schema is written against sea-query builders only, so the same
//! migrations run on Postgres (production) and SQLite (tests).

use std::str::FromStr;

pub use sea_orm::{ConnectionTrait, DatabaseConnection};
pub use sea_orm_migration::prelude::*;

mod m20251001_000001_init; // keep filename + module name in sync

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20251001_000001_init::Migration)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationCommand {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

impl FromStr for MigrationCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "fresh" => Ok(Self::Fresh),
            "reset" => Ok(Self::Reset),
            "refresh" => Ok(Self::Refresh),
            "status" => Ok(Self::Status),
            other => Err(format!(
                "unknown command '{other}' (expected up | down | fresh | reset | refresh | status)"
            )),
        }
    }
}

/// Run a migration command against an open connection.
///
/// Shared by the backend bootstrap, the migration CLI and tests.
pub async fn migrate(db: &DatabaseConnection, command: MigrationCommand) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let applied_before = count_applied_migrations(db).await?;

    tracing::info!(
        command = ?command,
        backend = ?backend,
        defined = Migrator::migrations().len(),
        applied = applied_before,
        "migration starting"
    );

    let result = match command {
        MigrationCommand::Up => Migrator::up(db, None).await,
        MigrationCommand::Down => Migrator::down(db, None).await,
        MigrationCommand::Fresh => Migrator::fresh(db).await,
        MigrationCommand::Reset => Migrator::reset(db).await,
        MigrationCommand::Refresh => Migrator::refresh(db).await,
        MigrationCommand::Status => Migrator::status(db).await,
    };

    match result {
        Ok(()) => {
            if command != MigrationCommand::Status {
                let applied_after = count_applied_migrations(db).await?;
                tracing::info!(command = ?command, applied = applied_after, "migration finished");
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!(command = ?command, error = %e, "migration failed");
            Err(e)
        }
    }
}

/// Number of applied migrations; 0 when the bookkeeping table is missing.
pub async fn count_applied_migrations(db: &DatabaseConnection) -> Result<usize, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => Ok(migrations.len()),
        Err(DbErr::Exec(_)) => Ok(0),
        Err(e) => Err(e),
    }
}

/// Name of the most recently applied migration, if any.
pub async fn get_latest_migration_version(
    db: &DatabaseConnection,
) -> Result<Option<String>, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => Ok(migrations.last().map(|m| m.name().to_string())),
        Err(DbErr::Exec(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
