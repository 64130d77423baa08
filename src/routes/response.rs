//! JSON response helpers shared by the route handlers

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use serde::Serialize;

pub type FullBody = Full<Bytes>;

/// Body of every error response: `{"error": "..."}`
#[derive(Debug, Serialize)]
struct ErrorResponse<'a> {
    error: &'a str,
}

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<FullBody> {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());
    let mut response = Response::new(Full::new(Bytes::from(json)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

pub fn error_response(status: StatusCode, error: &str) -> Response<FullBody> {
    json_response(status, &ErrorResponse { error })
}
