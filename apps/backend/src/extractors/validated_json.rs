use std::future::Future;
use std::ops::{Deref, DerefMut};
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::trace_ctx;

const INVALID_PAYLOAD: &str = "Invalid request payload";

/// JSON body extractor whose failures render as 400 problem details.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for ValidatedJson<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Bytes::from_request(req, payload);

        Box::pin(async move {
            let body = body.await.map_err(|e| {
                debug!(trace_id = %trace_ctx::trace_id(), error = %e, "failed to read request body");
                AppError::bad_request(ErrorCode::BadRequest, INVALID_PAYLOAD)
            })?;

            serde_json::from_slice::<T>(&body)
                .map(ValidatedJson)
                .map_err(|e| {
                    debug!(
                        trace_id = %trace_ctx::trace_id(),
                        category = ?e.classify(),
                        line = e.line(),
                        body_size = body.len(),
                        "JSON parsing failed"
                    );
                    AppError::bad_request(ErrorCode::BadRequest, INVALID_PAYLOAD)
                })
        })
    }
}
