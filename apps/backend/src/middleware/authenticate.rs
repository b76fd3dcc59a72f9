//! Bearer-token authentication.
//!
//! Verifies the `Authorization: Bearer <token>` header against the
//! `SecurityConfig` in `AppState` and stores the caller's [`Identity`] in the
//! request extensions. Any failure short-circuits with a 401 before the
//! wrapped service is called.

use std::rc::Rc;
use std::time::SystemTime;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::{verify_token, AuthError, Claim};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::identity::Identity;
use crate::logging::security;
use crate::state::app_state::AppState;

pub struct Authenticate;

impl<S, B> Transform<S, ServiceRequest> for Authenticate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticateMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthenticateMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthenticateMiddleware<S>
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

        Box::pin(async move {
            match authenticate(&req) {
                Ok(identity) => {
                    req.extensions_mut().insert(identity);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => {
                    security::auth_rejected(err.code().as_str(), req.path());
                    Ok(req.error_response(err).map_into_right_body())
                }
            }
        })
    }
}

fn authenticate(req: &ServiceRequest) -> Result<Identity, AppError> {
    let header_value = req.headers().get(header::AUTHORIZATION).ok_or_else(|| {
        AppError::unauthorized(
            ErrorCode::AuthHeaderMissing,
            "Authorization header required",
        )
    })?;

    let token = bearer_token(header_value.to_str().ok())?;

    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::internal("AppState not available"))?;

    let verified = verify_token(token, &state.security, SystemTime::now())
        .map_err(map_auth_error)?;

    Ok(Identity {
        subject_id: verified.subject_id,
        role: verified.role,
    })
}

/// Exactly two parts separated by a single space, the first being `Bearer`.
/// Tabs and repeated spaces are a format error, not a lenient match.
fn bearer_token(value: Option<&str>) -> Result<&str, AppError> {
    let malformed = || {
        AppError::unauthorized(
            ErrorCode::AuthHeaderMalformed,
            "Invalid authorization format",
        )
    };

    let mut parts = value.ok_or_else(malformed)?.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(token),
        _ => Err(malformed()),
    }
}

fn map_auth_error(err: AuthError) -> AppError {
    match err {
        AuthError::MissingClaim(Claim::Subject) => {
            AppError::unauthorized(ErrorCode::TokenSubjectMissing, "Invalid user ID in token")
        }
        AuthError::MissingClaim(Claim::Role) => {
            AppError::unauthorized(ErrorCode::TokenRoleMissing, "Invalid role in token")
        }
        AuthError::Malformed | AuthError::BadSignature | AuthError::Expired => {
            AppError::unauthorized(ErrorCode::InvalidToken, "Invalid or expired token")
        }
    }
}
