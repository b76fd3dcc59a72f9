//! Role gate layered after `Authenticate`.
//!
//! Reads the identity already in the request extensions; it never touches
//! the token or the database.

use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::Role;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::identity::role_from;
use crate::logging::security;

#[derive(Debug, Clone, Copy)]
pub struct RequireRole {
    role: Role,
}

impl RequireRole {
    pub fn supervisor() -> Self {
        Self {
            role: Role::Supervisor,
        }
    }

    pub fn admin() -> Self {
        Self { role: Role::Admin }
    }

    fn rejection(self) -> AppError {
        match self.role {
            Role::Supervisor => {
                AppError::forbidden(ErrorCode::SupervisorRequired, "Supervisor access required")
            }
            Role::Admin => AppError::forbidden(ErrorCode::AdminRequired, "Admin access required"),
            Role::Miner => AppError::forbidden(ErrorCode::Forbidden, "Forbidden"),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            gate: *self,
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    gate: RequireRole,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let gate = self.gate;

        Box::pin(async move {
            let actual = role_from(&req);
            if actual != Some(gate.role) {
                security::forbidden(
                    gate.role.as_str(),
                    actual.as_ref().map(Role::as_str),
                    req.path(),
                );
                return Ok(req.error_response(gate.rejection()).map_into_right_body());
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}
