//! Proxy-generated responses.
//!
//! # Responsibilities
//! - 404 guidance when no route matches
//! - 502 when the upstream call cannot be made or fails
//!
//! Upstream responses themselves are relayed by `proxy::forwarder`.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::proxy::ForwardError;

const NOT_CONFIGURED: &str = r#"Route not configured. Go to <a href="/admin">/admin</a>"#;

/// 404 with a link to the admin page.
pub fn route_not_configured() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        NOT_CONFIGURED,
    )
        .into_response()
}

/// 502 carrying the underlying error text.
pub fn proxy_error(err: &ForwardError) -> Response {
    (StatusCode::BAD_GATEWAY, format!("Proxy Error: {err}")).into_response()
}
