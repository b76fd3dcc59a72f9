//! Persistence functions, generic over `ConnectionTrait` so they run on a
//! pooled connection or inside a transaction.

pub mod checklists;
pub mod completions;
pub mod emergencies;
pub mod modules;
pub mod users;
