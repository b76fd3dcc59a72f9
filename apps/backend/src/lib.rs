#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

//! MineSafe backend: safety training, daily checklists and emergency
//! reporting for mining crews.

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod trace_ctx;

// Re-exports for public API
pub use auth::{issue_token, verify_token, Role};
pub use config::AppConfig;
pub use error::AppError;
pub use extractors::{AuthIdentity, Identity};
pub use infra::db::{bootstrap_db, connect_db};
pub use infra::state::build_state;
pub use middleware::{
    cors_middleware, Authenticate, RateLimit, RequestTimeout, RequestTrace, RequireRole,
    SlidingWindowLimiter, StructuredLogger, TraceSpan,
};
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
