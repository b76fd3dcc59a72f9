use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::db::{is_sqlite, sanitize_db_url, SQLITE_MEMORY_URL};
use crate::error::AppError;

/// Open a pooled connection. Does not run migrations.
pub async fn connect_db(database_url: &str) -> Result<DatabaseConnection, AppError> {
    let mut opts = ConnectOptions::new(database_url.to_owned());
    opts.connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    // Each pooled connection to `sqlite::memory:` is a separate database.
    if database_url == SQLITE_MEMORY_URL {
        opts.max_connections(1).min_connections(1);
    } else if !is_sqlite(database_url) {
        opts.max_connections(20).min_connections(2);
    }

    let conn = Database::connect(opts).await?;
    info!(url = %sanitize_db_url(database_url), "database connected");
    Ok(conn)
}

/// Connect and bring the schema up to date.
pub async fn bootstrap_db(database_url: &str) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(database_url).await?;
    migrate(&conn, MigrationCommand::Up).await?;
    Ok(conn)
}
