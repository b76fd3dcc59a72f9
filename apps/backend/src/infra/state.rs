use std::sync::Arc;

use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::services::geocode::Geocoder;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for creating AppState instances (used in both tests and main).
/// The signing secret is a constructor argument so no caller can end up
/// with a built-in one.
pub struct StateBuilder {
    security_config: SecurityConfig,
    database_url: Option<String>,
    geocoder: Option<Arc<dyn Geocoder>>,
}

impl StateBuilder {
    pub fn new(security_config: SecurityConfig) -> Self {
        Self {
            security_config,
            database_url: None,
            geocoder: None,
        }
    }

    pub fn with_db_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn with_geocoder(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let state = match self.database_url {
            // single entrypoint: connect + migrate
            Some(url) => AppState::new(bootstrap_db(&url).await?, self.security_config),
            None => AppState::new_without_db(self.security_config),
        };
        Ok(match self.geocoder {
            Some(geocoder) => state.with_geocoder(geocoder),
            None => state,
        })
    }
}

pub fn build_state(security_config: SecurityConfig) -> StateBuilder {
    StateBuilder::new(security_config)
}
