use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::test;
use minesafe_backend::middleware::{ManualClock, RateLimit, SlidingWindowLimiter};

use crate::common::assert_problem;
use crate::support::{create_test_app, test_state};

fn health_from(addr: SocketAddr) -> actix_http::Request {
    test::TestRequest::get()
        .uri("/api/health")
        .peer_addr(addr)
        .to_request()
}

#[actix_web::test]
async fn hundred_and_first_request_in_window_is_rejected() {
    let clock = ManualClock::new();
    let limiter = Arc::new(SlidingWindowLimiter::with_clock(
        100,
        Duration::from_secs(60),
        clock.clone(),
    ));
    let app = create_test_app(test_state().await)
        .with_rate_limit(RateLimit::new(Arc::clone(&limiter)))
        .build()
        .await;
    let client: SocketAddr = "10.1.2.3:50000".parse().unwrap();

    for i in 0..100 {
        let resp = test::call_service(&app, health_from(client)).await;
        assert_eq!(resp.status(), StatusCode::OK, "request {} should pass", i + 1);
        clock.advance(Duration::from_millis(100));
    }

    let resp = test::call_service(&app, health_from(client)).await;
    assert_eq!(resp.headers().get("retry-after").unwrap(), "60");
    assert_problem(
        resp,
        StatusCode::TOO_MANY_REQUESTS,
        "RATE_LIMITED",
        "Rate limit exceeded",
    )
    .await;

    // Another address has its own window.
    let other: SocketAddr = "10.9.9.9:50000".parse().unwrap();
    assert_eq!(
        test::call_service(&app, health_from(other)).await.status(),
        StatusCode::OK
    );

    clock.advance(Duration::from_secs(61));
    assert_eq!(
        test::call_service(&app, health_from(client)).await.status(),
        StatusCode::OK
    );
}

#[actix_web::test]
async fn disabled_limiter_admits_everything() {
    let app = create_test_app(test_state().await).build().await;
    let client: SocketAddr = "10.1.2.3:50000".parse().unwrap();

    for _ in 0..150 {
        assert_eq!(
            test::call_service(&app, health_from(client)).await.status(),
            StatusCode::OK
        );
    }
}
