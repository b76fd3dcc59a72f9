use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::services::geocode::{Geocoder, NoopGeocoder};

/// Shared resources handed to every handler through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios)
    pub db: Option<DatabaseConnection>,
    pub security: SecurityConfig,
    /// Reverse geocoder used when recording emergencies
    pub geocoder: Arc<dyn Geocoder>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, security: SecurityConfig) -> Self {
        Self {
            db: Some(db),
            security,
            geocoder: Arc::new(NoopGeocoder),
        }
    }

    pub fn new_without_db(security: SecurityConfig) -> Self {
        Self {
            db: None,
            security,
            geocoder: Arc::new(NoopGeocoder),
        }
    }

    pub fn with_geocoder(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geocoder = geocoder;
        self
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db.is_some())
            .field("security", &"<redacted>")
            .finish()
    }
}
