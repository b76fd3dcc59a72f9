#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::Value;

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// Read a JSON body after checking the status.
pub async fn json_with_status<B>(resp: ServiceResponse<B>, expected: StatusCode) -> Value
where
    B: MessageBody,
{
    assert_eq!(resp.status(), expected, "unexpected HTTP status");
    test::read_body_json(resp).await
}

/// Assert a problem-details error with the given code and exact detail.
pub async fn assert_problem<B>(
    resp: ServiceResponse<B>,
    expected_status: StatusCode,
    expected_code: &str,
    expected_detail: &str,
) where
    B: MessageBody + 'static,
{
    let problem = backend_test_support::problem_details::assert_problem_details(
        resp.map_into_boxed_body(),
        expected_code,
        expected_status,
        Some(expected_detail),
    )
    .await;
    assert_eq!(problem.detail, expected_detail);
}
