pub mod gates;
pub mod login;
pub mod rate_limit;
