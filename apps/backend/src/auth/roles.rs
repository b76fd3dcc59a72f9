//! User roles.
//!
//! The database stores `ADMIN`, `SUPERVISOR` and `MINER`. `OPERATOR` is
//! accepted on input as a synonym for `MINER` and never written back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Supervisor,
    #[serde(alias = "OPERATOR")]
    Miner,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Supervisor => "SUPERVISOR",
            Role::Miner => "MINER",
        }
    }

    /// Prefix of generated `users.user_id` values.
    pub const fn id_prefix(&self) -> &'static str {
        match self {
            Role::Admin => "ADM-",
            Role::Supervisor => "SUP-",
            Role::Miner => "MIN-",
        }
    }

    pub fn new_user_id(&self) -> String {
        format!("{}{}", self.id_prefix(), uuid::Uuid::new_v4())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "SUPERVISOR" => Ok(Role::Supervisor),
            "MINER" | "OPERATOR" => Ok(Role::Miner),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
