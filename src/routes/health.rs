//! Liveness probe
//!
//! `GET /health` answers as long as the process is serving HTTP. It does not
//! touch MongoDB: the connection is verified once at startup and store
//! failures surface per request as 500s.

use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::routes::{json_response, FullBody};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub service: &'static str,
    pub version: &'static str,
}

pub fn health_check() -> Response<FullBody> {
    json_response(
        StatusCode::OK,
        &HealthResponse {
            healthy: true,
            service: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}
