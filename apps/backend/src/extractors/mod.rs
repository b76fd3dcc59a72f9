pub mod identity;
pub mod path_params;
pub mod validated_json;

pub use identity::{identity_from, role_from, subject_id_from, AuthIdentity, Identity};
pub use path_params::{RecordId, UserIdParam};
pub use validated_json::ValidatedJson;
