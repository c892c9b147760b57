//! Problem Details test helpers
//!
//! Asserts the gateway's `application/problem+json` error contract without
//! depending on gateway types, so both unit tests and integration tests can
//! share one definition of what an error response looks like.

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::HeaderMap;
use actix_web::http::StatusCode;
use serde::Deserialize;

/// Mirror of the gateway's ProblemDetails body
#[derive(Debug, Deserialize)]
pub struct Problem {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

/// Parse a problem body and check it against the response headers.
///
/// Panics unless the content type is `application/problem+json`, the body
/// parses, the body `status` equals the HTTP status and the body `trace_id`
/// equals the `x-trace-id` header.
pub fn parse_problem(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> Problem {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(content_type, "application/problem+json");

    let problem: Problem =
        serde_json::from_slice(body).expect("response body should be ProblemDetails JSON");
    assert_eq!(problem.status, status.as_u16());

    let trace_header = headers
        .get("x-trace-id")
        .expect("x-trace-id header should be present")
        .to_str()
        .expect("x-trace-id header should be ASCII");
    assert_eq!(
        problem.trace_id, trace_header,
        "trace_id in body should match x-trace-id header"
    );

    problem
}

/// Assert that a test-service response is a problem with the given status and code.
///
/// Returns the parsed problem so callers can make further assertions on `detail`.
pub async fn assert_problem(
    resp: ServiceResponse<BoxBody>,
    expected_status: StatusCode,
    expected_code: &str,
) -> Problem {
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = actix_web::test::read_body(resp).await;

    assert_eq!(status, expected_status, "unexpected status, body: {body:?}");
    let problem = parse_problem(status, &headers, &body);
    assert_eq!(problem.code, expected_code);
    problem
}
