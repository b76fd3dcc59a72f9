use std::time::Duration;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use minesafe_backend::bootstrap::seed_checklist_defaults;
use minesafe_backend::config::db::SQLITE_MEMORY_URL;
use minesafe_backend::db::require_db;
use minesafe_backend::infra::state::build_state;
use minesafe_backend::middleware::{RateLimit, RequestTimeout, RequestTrace};
use minesafe_backend::routes;
use minesafe_backend::state::app_state::AppState;

use super::auth::test_security;

/// Fresh in-memory SQLite state with migrations applied and the default
/// checklist items seeded. Every call gets its own database.
pub async fn test_state() -> AppState {
    let state = build_state(test_security())
        .with_db_url(SQLITE_MEMORY_URL)
        .build()
        .await
        .expect("build test state");
    seed_checklist_defaults(require_db(&state).expect("db"))
        .await
        .expect("seed checklist defaults");
    state
}

/// Builder for test Actix service instances over the production routes.
pub struct TestAppBuilder {
    state: AppState,
    rate_limit: RateLimit,
    request_timeout: Duration,
}

impl TestAppBuilder {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            rate_limit: RateLimit::disabled(),
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimit) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn with_request_timeout(mut self, limit: Duration) -> Self {
        self.request_timeout = limit;
        self
    }

    pub async fn build(
        self,
    ) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
        test::init_service(
            App::new()
                .wrap(RequestTimeout::new(self.request_timeout))
                .wrap(self.rate_limit)
                .wrap(RequestTrace)
                .app_data(web::Data::new(self.state))
                .configure(routes::configure),
        )
        .await
    }
}

pub fn create_test_app(state: AppState) -> TestAppBuilder {
    TestAppBuilder::new(state)
}
