use minesafe_backend::config::RuntimeEnv;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "info,actix_web=info,sqlx=warn,sea_orm=warn";

/// JSON lines in production, compact text in development.
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing(runtime: RuntimeEnv) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(env_filter);

    if runtime.is_prod() {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .json()
                    .flatten_event(true),
            )
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).compact())
            .init();
    }
}
