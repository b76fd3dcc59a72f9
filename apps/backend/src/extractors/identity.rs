//! Request-scoped caller identity.
//!
//! `Authenticate` inserts an [`Identity`] into the request extensions once;
//! handlers read it back through the accessors or the [`AuthIdentity`]
//! extractor. Nothing here parses tokens.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};

use crate::auth::Role;
use crate::error::AppError;
use crate::errors::ErrorCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject_id: String,
    pub role: Role,
}

impl Identity {
    pub fn is_supervisor(&self) -> bool {
        self.role == Role::Supervisor
    }
}

/// `None` when the request never passed through `Authenticate`.
pub fn identity_from(msg: &impl HttpMessage) -> Option<Identity> {
    msg.extensions().get::<Identity>().cloned()
}

pub fn subject_id_from(msg: &impl HttpMessage) -> Option<String> {
    msg.extensions()
        .get::<Identity>()
        .map(|id| id.subject_id.clone())
}

pub fn role_from(msg: &impl HttpMessage) -> Option<Role> {
    msg.extensions().get::<Identity>().map(|id| id.role)
}

/// Extractor for handlers behind `Authenticate`; 401 if the identity is missing.
#[derive(Debug, Clone)]
pub struct AuthIdentity(pub Identity);

impl std::ops::Deref for AuthIdentity {
    type Target = Identity;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for AuthIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            identity_from(req)
                .map(AuthIdentity)
                .ok_or_else(|| AppError::unauthorized(ErrorCode::Unauthorized, "Unauthorized")),
        )
    }
}
