use clap::Parser;
use migration::{get_latest_migration_version, migrate, MigrationCommand};
use sea_orm::Database;

#[derive(Parser)]
#[command(name = "migration-cli")]
#[command(about = "MineSafe database migration tool")]
struct Args {
    /// up | down | fresh | reset | refresh | status
    command: MigrationCommand,

    /// Target database (postgres://... or sqlite://path?mode=rwc)
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_env_filter("migration=info,sqlx=warn")
        .init();

    let args = Args::parse();

    if args.database_url.contains(":memory:") {
        eprintln!("In-memory SQLite is discarded when the CLI exits; use a file or Postgres URL.");
        std::process::exit(2);
    }

    let db = match Database::connect(&args.database_url).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to connect: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = migrate(&db, args.command).await {
        eprintln!("Migration failed: {e}");
        std::process::exit(1);
    }

    match get_latest_migration_version(&db).await {
        Ok(Some(version)) => tracing::info!(version = %version, "schema version"),
        Ok(None) => tracing::info!("no migrations applied"),
        Err(e) => tracing::warn!(error = %e, "could not read schema version"),
    }
}
