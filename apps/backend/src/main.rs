use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use minesafe_backend::bootstrap::{ensure_admin, seed_checklist_defaults};
use minesafe_backend::config::db::sanitize_db_url;
use minesafe_backend::config::{AppConfig, RuntimeEnv};
use minesafe_backend::db::require_db;
use minesafe_backend::infra::state::build_state;
use minesafe_backend::middleware::{
    cors_middleware, spawn_sweeper, RateLimit, RequestTimeout, RequestTrace, SlidingWindowLimiter,
    StructuredLogger, TraceSpan,
};
use minesafe_backend::routes;
use minesafe_backend::services::geocode::{Geocoder, LocationIqGeocoder, NoopGeocoder};
use tracing::{error, info, warn};

mod telemetry;

fn fail(message: impl std::fmt::Display) -> ! {
    error!("{message}");
    eprintln!("❌ {message}");
    std::process::exit(1);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing(RuntimeEnv::from_env());

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => fail(format!("Invalid configuration: {e}")),
    };
    info!(config = ?config, "configuration loaded");

    let geocoder: Arc<dyn Geocoder> = match &config.locationiq_api_key {
        Some(key) => match LocationIqGeocoder::new(key.clone()) {
            Ok(g) => Arc::new(g),
            Err(e) => fail(format!("Failed to build geocoder client: {e}")),
        },
        None => {
            warn!("LOCATIONIQ_API_KEY not set; emergency locations fall back to coordinates");
            Arc::new(NoopGeocoder)
        }
    };

    let app_state = match build_state(config.security())
        .with_db_url(config.database_url.clone())
        .with_geocoder(geocoder)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => fail(format!(
            "Failed to build application state ({}): {e}",
            sanitize_db_url(&config.database_url)
        )),
    };

    // Startup data is idempotent; rerunning on every boot is safe.
    if let Ok(db) = require_db(&app_state) {
        if let Some(admin) = &config.admin {
            if let Err(e) = ensure_admin(db, admin, &app_state.security).await {
                fail(format!("Administrator bootstrap failed: {e}"));
            }
        }
        if let Err(e) = seed_checklist_defaults(db).await {
            fail(format!("Checklist seeding failed: {e}"));
        }
    }

    let (rate_limit, sweeper) = if config.rate_limit.enabled {
        let limiter = Arc::new(SlidingWindowLimiter::new(
            config.rate_limit.limit,
            config.rate_limit.window,
        ));
        let sweeper = spawn_sweeper(Arc::clone(&limiter), config.rate_limit.sweep_interval);
        (RateLimit::new(limiter), Some(sweeper))
    } else {
        warn!("rate limiting disabled");
        (RateLimit::disabled(), None)
    };

    let data = web::Data::new(app_state);
    let request_timeout = config.request_timeout;
    let origins = config.cors_allowed_origins.clone();

    info!(host = %config.host, port = config.port, "starting MineSafe backend");

    let result = HttpServer::new(move || {
        App::new()
            .wrap(RequestTimeout::new(request_timeout))
            .wrap(rate_limit.clone())
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .wrap(cors_middleware(&origins))
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .client_request_timeout(Duration::from_secs(15))
    .keep_alive(Duration::from_secs(60))
    .workers(num_cpus::get())
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    if let Some(sweeper) = sweeper {
        sweeper.shutdown().await;
    }
    result
}
