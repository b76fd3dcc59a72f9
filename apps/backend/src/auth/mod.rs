pub mod claims;
pub mod jwt;
pub mod password;
pub mod roles;

pub use claims::{Claim, VerifiedToken};
pub use jwt::{issue_token, verify_token, AuthError, TOKEN_TTL};
pub use roles::Role;
