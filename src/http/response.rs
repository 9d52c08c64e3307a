//! Webhook responses.
//!
//! # Design Decisions
//! - Responses never carry a body
//! - CORS headers only on success; a 400 is bare
//! - The status says nothing about dispatch, which happens afterwards

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

const ALLOW_ORIGIN: HeaderValue = HeaderValue::from_static("*");
const ALLOW_METHODS: HeaderValue = HeaderValue::from_static("GET, POST, PUT, DELETE");

/// 200 with permissive CORS headers.
pub fn accepted() -> Response {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN),
            (header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS),
        ],
    )
        .into_response()
}

/// 400 with an empty body.
pub fn bad_request() -> Response {
    StatusCode::BAD_REQUEST.into_response()
}
