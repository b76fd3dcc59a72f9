//! Assertions for the problem-details error contract.
//!
//! Kept independent of the backend crate so both unit and integration
//! tests can use it without a dependency cycle.

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::HeaderMap;
use actix_web::http::StatusCode;
use serde::Deserialize;

/// Mirror of the backend's problem-details body.
#[derive(Debug, Deserialize)]
pub struct ProblemDetailsLike {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

/// Parse and check a problem-details body.
///
/// Validates status, `code`, the `x-trace-id` header matching the body's
/// `trace_id`, and (optionally) that `detail` contains the given text.
/// Returns the parsed body for further assertions.
pub fn assert_problem_details_from_parts(
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
    expected_code: &str,
    expected_status: StatusCode,
    expected_detail_contains: Option<&str>,
) -> ProblemDetailsLike {
    assert_eq!(status, expected_status, "unexpected HTTP status");

    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(content_type, "application/problem+json");

    let problem: ProblemDetailsLike =
        serde_json::from_slice(body).expect("body should be problem-details JSON");

    let header_trace = headers
        .get("x-trace-id")
        .expect("x-trace-id header should be present")
        .to_str()
        .expect("x-trace-id should be ASCII");
    assert_eq!(problem.trace_id, header_trace, "trace_id parity");

    assert_eq!(problem.code, expected_code);
    assert_eq!(problem.status, expected_status.as_u16());

    if let Some(needle) = expected_detail_contains {
        assert!(
            problem.detail.contains(needle),
            "expected detail to contain {needle:?}, got {:?}",
            problem.detail
        );
    }

    problem
}

/// Same as [`assert_problem_details_from_parts`], reading a test response.
pub async fn assert_problem_details(
    resp: ServiceResponse<BoxBody>,
    expected_code: &str,
    expected_status: StatusCode,
    expected_detail_contains: Option<&str>,
) -> ProblemDetailsLike {
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = actix_web::test::read_body(resp).await;

    assert_problem_details_from_parts(
        status,
        &headers,
        &body,
        expected_code,
        expected_status,
        expected_detail_contains,
    )
}
