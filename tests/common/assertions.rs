//! Assertion helpers for error responses.

use axum::http::StatusCode;
use axum_test::TestResponse;
use pretty_assertions::assert_eq;
use serde_json::Value;

/// Assert an error response with the standard `{"error", "status"}` body
pub fn assert_error(response: &TestResponse, status: StatusCode, message: &str) {
    response.assert_status(status);
    let body: Value = response.json();
    assert_eq!(body["error"], message);
    assert_eq!(body["status"], status.as_u16());
}
