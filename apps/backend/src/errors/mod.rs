//! Error vocabulary for the MineSafe backend.

pub mod error_code;

pub use error_code::ErrorCode;
