//! Upstream forwarding.
//!
//! # Data Flow
//! ```text
//! RouteMatch { route, remaining } + inbound request
//!     → rewrite.rs (target URL + remaining path + query)
//!     → headers.rs (copy, drop hop-by-hop, set Host)
//!     → forwarder.rs (send with streamed body, no redirects)
//!     → upstream response relayed with streamed body
//! ```
//!
//! # Design Decisions
//! - Transparent relay: redirects go back to the client untouched
//! - Bodies are streamed in both directions, never buffered
//! - No retries; a failed upstream call is the client's to retry

pub mod forwarder;
pub mod headers;
pub mod rewrite;

use thiserror::Error;

pub use forwarder::RequestForwarder;
pub use rewrite::upstream_url;

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("invalid target URL '{target}': {source}")]
    InvalidTarget {
        target: String,
        #[source]
        source: url::ParseError,
    },

    #[error("target URL '{0}' cannot carry a path")]
    OpaqueTarget(String),

    #[error("invalid header for upstream request: {0}")]
    Header(String),

    #[error("failed to build upstream client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{0}")]
    Upstream(#[from] reqwest::Error),
}
