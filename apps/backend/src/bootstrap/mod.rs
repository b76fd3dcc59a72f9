pub mod seed;

pub use seed::{ensure_admin, seed_checklist_defaults};
