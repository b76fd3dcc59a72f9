//! Per-client sliding-window admission control.
//!
//! The limiter is built once at startup and shared as `Arc` between the
//! `RateLimit` middleware and the background sweeper. All reads and writes
//! of the address map happen under one lock.

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use futures_util::future::{ready, LocalBoxFuture, Ready};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::AppError;
use crate::logging::security;

/// Source of "now" for the limiter.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Used to drive the limiter in tests.
#[derive(Debug, Clone)]
pub struct ManualClock {
    base: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock()
    }
}

pub struct SlidingWindowLimiter<C: Clock = SystemClock> {
    limit: usize,
    window: Duration,
    clock: C,
    entries: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl SlidingWindowLimiter<SystemClock> {
    pub fn new(limit: usize, window: Duration) -> Self {
        Self::with_clock(limit, window, SystemClock)
    }
}

impl<C: Clock> SlidingWindowLimiter<C> {
    pub fn with_clock(limit: usize, window: Duration, clock: C) -> Self {
        Self {
            limit,
            window,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Admit or reject one request from `key`.
    ///
    /// Rejected calls are not recorded. The pruned sequence is written back
    /// either way, and a key whose sequence prunes to nothing is dropped.
    pub fn allow(&self, key: &str) -> bool {
        let now = self.clock.now();
        let mut entries = self.entries.lock();

        let mut stamps = entries.remove(key).unwrap_or_default();
        prune(&mut stamps, now, self.window);

        let admitted = stamps.len() < self.limit;
        if admitted {
            stamps.push_back(now);
        }
        if !stamps.is_empty() {
            entries.insert(key.to_string(), stamps);
        }

        admitted
    }

    /// Drop timestamps outside the window and remove keys left empty.
    /// Returns how many keys were removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        let before = entries.len();

        entries.retain(|_, stamps| {
            prune(stamps, now, self.window);
            !stamps.is_empty()
        });

        before - entries.len()
    }

    pub fn tracked_keys(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_tracked(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }
}

/// Stamps are appended in order, so stale ones are always at the front.
fn prune(stamps: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(oldest) = stamps.front() {
        if now.saturating_duration_since(*oldest) >= window {
            stamps.pop_front();
        } else {
            break;
        }
    }
}

/// Handle to the background sweep task.
pub struct SweeperHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stop the sweep loop and wait for it to exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            debug!(error = %e, "rate limit sweeper join failed");
        }
    }
}

/// Shortest sweep period; `tokio::time::interval` panics on zero.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(10);

/// Run `limiter.sweep()` every `interval` until the handle is shut down.
pub fn spawn_sweeper<C: Clock>(
    limiter: Arc<SlidingWindowLimiter<C>>,
    interval: Duration,
) -> SweeperHandle {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let interval = interval.max(MIN_SWEEP_INTERVAL);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    let removed = limiter.sweep();
                    if removed > 0 {
                        debug!(removed, remaining = limiter.tracked_keys(), "rate limit sweep");
                    }
                }
            }
        }
        info!("rate limit sweeper stopped");
    });

    SweeperHandle { cancel, task }
}

/// What the middleware needs from a limiter, independent of its clock.
trait Admission: Send + Sync {
    fn allow(&self, key: &str) -> bool;
    fn window(&self) -> Duration;
}

impl<C: Clock> Admission for SlidingWindowLimiter<C> {
    fn allow(&self, key: &str) -> bool {
        SlidingWindowLimiter::allow(self, key)
    }

    fn window(&self) -> Duration {
        self.window
    }
}

/// Rate limiting middleware. `RateLimit::disabled()` admits everything.
#[derive(Clone)]
pub struct RateLimit {
    limiter: Option<Arc<dyn Admission>>,
}

impl RateLimit {
    pub fn new<C: Clock>(limiter: Arc<SlidingWindowLimiter<C>>) -> Self {
        Self {
            limiter: Some(limiter),
        }
    }

    pub fn disabled() -> Self {
        Self { limiter: None }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limiter: Option<Arc<dyn Admission>>,
}

/// Peer IP without the port, or `"unknown"`.
fn client_key(req: &ServiceRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let limiter = self.limiter.clone();

        Box::pin(async move {
            if let Some(limiter) = limiter {
                let key = client_key(&req);
                if !limiter.allow(&key) {
                    security::rate_limited(&key, req.path());
                    let err = AppError::rate_limited(limiter.window().as_secs().max(1));
                    return Ok(req.error_response(err).map_into_right_body());
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}
