//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID + trace layers)
//!     → /admin, /api/config  → admin handlers
//!     → anything else        → proxy_handler
//!         → store::ConfigCache (routes) → routing (match)
//!         → proxy::RequestForwarder (upstream)
//!         → response.rs (404 / 502 when there is nothing to relay)
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
