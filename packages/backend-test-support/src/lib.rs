//! Shared helpers for MineSafe backend tests.
//!
//! Logging bootstrap, problem-details assertions and unique fixture data.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
