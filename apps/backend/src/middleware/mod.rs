pub mod authenticate;
pub mod cors;
pub mod rate_limit;
pub mod request_timeout;
pub mod request_trace;
pub mod require_role;
pub mod structured_logger;
pub mod trace_span;

pub use authenticate::Authenticate;
pub use cors::cors_middleware;
pub use rate_limit::{
    spawn_sweeper, Clock, ManualClock, RateLimit, SlidingWindowLimiter, SweeperHandle, SystemClock,
};
pub use request_timeout::RequestTimeout;
pub use request_trace::{RequestTrace, TraceId};
pub use require_role::RequireRole;
pub use structured_logger::StructuredLogger;
pub use trace_span::TraceSpan;
