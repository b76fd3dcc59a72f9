pub mod app;
pub mod db;

pub use app::{AppConfig, RateLimitConfig};
pub use db::{database_url, RuntimeEnv};
