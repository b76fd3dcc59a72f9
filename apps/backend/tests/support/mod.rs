#![allow(dead_code)]

pub mod app_builder;
pub mod auth;
pub mod factory;

pub use app_builder::{create_test_app, test_state};
pub use auth::{bearer_for, expired_bearer_for, test_security};
