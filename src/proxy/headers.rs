//! Header adjustments between client and upstream.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers in both directions
//! - Point `Host` at the upstream target
//!
//! Everything else (auth, content type, cookies) passes through untouched.

use axum::http::header::{HeaderMap, HeaderValue, HOST};
use url::Url;

use crate::proxy::rewrite::host_header;
use crate::proxy::ForwardError;

/// Hop-by-hop headers that must not be forwarded.
pub const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
];

pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP {
        headers.remove(*name);
    }
}

/// Copy the inbound headers for the upstream request and set `Host`.
pub fn upstream_headers(inbound: &HeaderMap, upstream: &Url) -> Result<HeaderMap, ForwardError> {
    let mut headers = inbound.clone();
    strip_hop_by_hop(&mut headers);

    let host = host_header(upstream)
        .ok_or_else(|| ForwardError::Header(format!("upstream URL '{upstream}' has no host")))?;
    let value = HeaderValue::from_str(&host).map_err(|e| ForwardError::Header(e.to_string()))?;
    headers.insert(HOST, value);
    Ok(headers)
}
