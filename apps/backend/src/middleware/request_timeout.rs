//! Upper bound on time spent in downstream services.

use std::rc::Rc;
use std::time::Duration;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::warn;

use crate::error::AppError;
use crate::trace_ctx;

#[derive(Debug, Clone, Copy)]
pub struct RequestTimeout {
    limit: Duration,
}

impl RequestTimeout {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestTimeout
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestTimeoutMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTimeoutMiddleware {
            service: Rc::new(service),
            limit: self.limit,
        }))
    }
}

pub struct RequestTimeoutMiddleware<S> {
    service: Rc<S>,
    limit: Duration,
}

impl<S, B> Service<ServiceRequest> for RequestTimeoutMiddleware<S>
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
        let limit = self.limit;
        let http_req = req.request().clone();
        let fut = self.service.call(req);

        Box::pin(async move {
            match tokio::time::timeout(limit, fut).await {
                Ok(result) => result.map(ServiceResponse::map_into_left_body),
                Err(_) => {
                    warn!(
                        trace_id = %trace_ctx::trace_id(),
                        path = %http_req.path(),
                        limit_ms = limit.as_millis() as u64,
                        "request timed out"
                    );
                    // Rendered here so the body carries the current trace id.
                    Ok(ServiceResponse::from_err(AppError::timeout(), http_req)
                        .map_into_right_body())
                }
            }
        })
    }
}
