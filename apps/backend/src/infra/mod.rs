//! Infrastructure: connection setup, state assembly and database error mapping.

pub mod db;
pub mod db_errors;
pub mod state;
