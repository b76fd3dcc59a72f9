//! Task-local trace id for the request being served.
//!
//! `RequestTrace` opens the scope; error rendering and security logging
//! read it without threading the id through every call.

use std::future::Future;

use tokio::task_local;

const UNKNOWN: &str = "unknown";

task_local! {
    static TRACE_ID: String;
}

/// Trace id of the current request, if running inside one.
pub fn current() -> Option<String> {
    TRACE_ID.try_with(Clone::clone).ok()
}

/// Trace id of the current request, or `"unknown"` outside a request.
pub fn trace_id() -> String {
    current().unwrap_or_else(|| UNKNOWN.to_string())
}

/// Drive `future` with `trace_id` visible to [`trace_id`].
pub async fn with_trace_id<F>(trace_id: String, future: F) -> F::Output
where
    F: Future,
{
    TRACE_ID.scope(trace_id, future).await
}
