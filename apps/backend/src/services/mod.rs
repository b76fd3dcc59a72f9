//! Business rules behind each route group. Services take a connection and
//! plain inputs and return serializable views.

pub mod auth;
pub mod checklists;
pub mod dashboard;
pub mod emergencies;
pub mod geocode;
pub mod miners;
pub mod modules;
pub mod streaks;
pub mod supervisors;
pub mod users;
