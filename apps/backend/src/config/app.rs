//! Process configuration loaded once from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use super::db::{database_url, RuntimeEnv};
use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

const DEV_JWT_SECRET: &str = "minesafe-dev-secret-change-me";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub limit: usize,
    pub window: Duration,
    pub sweep_interval: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            limit: 100,
            window: Duration::from_secs(60),
            sweep_interval: Duration::from_secs(300),
        }
    }
}

/// Credentials for the administrator account ensured at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub runtime_env: RuntimeEnv,
    pub database_url: String,
    pub jwt_secret: String,
    pub rate_limit: RateLimitConfig,
    pub request_timeout: Duration,
    pub cors_allowed_origins: Vec<String>,
    pub locationiq_api_key: Option<String>,
    pub admin: Option<AdminBootstrap>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("runtime_env", &self.runtime_env)
            .field("rate_limit", &self.rate_limit)
            .field("request_timeout", &self.request_timeout)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("locationiq", &self.locationiq_api_key.is_some())
            .field("admin", &self.admin)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let runtime_env = RuntimeEnv::from_env();

        let host = env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_var("BACKEND_PORT", 8080u16)?;

        let jwt_secret = match non_empty_var("JWT_SECRET") {
            Some(secret) => secret,
            None if runtime_env.is_prod() => {
                return Err(AppError::config("JWT_SECRET must be set in production"));
            }
            None => {
                warn!("JWT_SECRET not set, using the development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let rate_limit = RateLimitConfig {
            enabled: parse_bool("RATE_LIMIT_ENABLED", true)?,
            limit: parse_var("RATE_LIMIT_PER_MINUTE", 100usize)?,
            window: Duration::from_secs(parse_var("RATE_LIMIT_WINDOW_SECS", 60u64)?),
            sweep_interval: Duration::from_secs(parse_var("RATE_LIMIT_SWEEP_SECS", 300u64)?),
        };
        if rate_limit.limit == 0 || rate_limit.window.is_zero() {
            return Err(AppError::config(
                "RATE_LIMIT_PER_MINUTE and RATE_LIMIT_WINDOW_SECS must be positive",
            ));
        }
        if rate_limit.sweep_interval.is_zero() {
            return Err(AppError::config("RATE_LIMIT_SWEEP_SECS must be positive"));
        }

        let request_timeout = Duration::from_secs(parse_var("REQUEST_TIMEOUT_SECS", 30u64)?);
        if request_timeout.is_zero() {
            return Err(AppError::config("REQUEST_TIMEOUT_SECS must be positive"));
        }

        let admin = match (non_empty_var("ADMIN_EMAIL"), non_empty_var("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminBootstrap { email, password }),
            (Some(_), None) | (None, Some(_)) => {
                warn!("ADMIN_EMAIL and ADMIN_PASSWORD must both be set; skipping admin bootstrap");
                None
            }
            (None, None) => None,
        };

        Ok(Self {
            host,
            port,
            runtime_env,
            database_url: database_url(runtime_env)?,
            jwt_secret,
            rate_limit,
            request_timeout,
            cors_allowed_origins: parse_origins(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default()),
            locationiq_api_key: non_empty_var("LOCATIONIQ_API_KEY"),
            admin,
        })
    }

    pub fn security(&self) -> SecurityConfig {
        SecurityConfig::new(self.jwt_secret.as_bytes())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
{
    match non_empty_var(name) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| AppError::config(format!("{name} must be a valid number, got '{raw}'"))),
    }
}

fn parse_bool(name: &str, default: bool) -> Result<bool, AppError> {
    match non_empty_var(name).map(|v| v.to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
        Some(v) => Err(AppError::config(format!(
            "{name} must be a boolean, got '{v}'"
        ))),
    }
}

/// Comma-separated origins; empty and `null` entries and non-http(s) values are ignored.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(str::to_string)
        .collect()
}
