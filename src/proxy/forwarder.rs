//! Upstream request execution.

use std::time::Duration;

use axum::body::{Body, HttpBody};
use axum::http::Request;
use axum::response::Response;

use crate::config::UpstreamConfig;
use crate::proxy::headers::{strip_hop_by_hop, upstream_headers};
use crate::proxy::rewrite::upstream_url;
use crate::proxy::ForwardError;
use crate::routing::Route;

/// Sends matched requests upstream and relays the response.
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct RequestForwarder {
    client: reqwest::Client,
}

impl RequestForwarder {
    pub fn new(config: &UpstreamConfig) -> Result<Self, ForwardError> {
        let mut builder = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy();
        if let Some(secs) = config.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(ForwardError::Client)?;
        Ok(Self { client })
    }

    /// Forward `request` to `route`'s target with `remaining` appended.
    ///
    /// Dropping the returned future (client went away) cancels the upstream call.
    pub async fn forward(
        &self,
        route: &Route,
        remaining: &str,
        request: Request<Body>,
    ) -> Result<Response, ForwardError> {
        let (parts, body) = request.into_parts();
        let url = upstream_url(&route.target, remaining, parts.uri.query())?;
        let headers = upstream_headers(&parts.headers, &url)?;

        tracing::debug!(
            method = %parts.method,
            upstream = %url,
            "Forwarding request"
        );

        let mut upstream = self.client.request(parts.method, url).headers(headers);
        if body.size_hint().exact() != Some(0) {
            upstream = upstream.body(reqwest::Body::wrap_stream(body.into_data_stream()));
        }

        let response = upstream.send().await?;
        Ok(relay(response))
    }
}

/// Convert the upstream response into a client response, streaming the body.
fn relay(upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    strip_hop_by_hop(&mut headers);

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
