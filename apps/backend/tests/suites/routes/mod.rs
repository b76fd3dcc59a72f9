pub mod admin;
pub mod checklists;
pub mod emergencies;
pub mod miners;
pub mod modules;
pub mod streaks;
