//! Prefix-routing reverse proxy library.
//!
//! Requests are matched against routing rules by longest path prefix and
//! forwarded to the rule's target. Rules live in a key-value store, are
//! cached in memory for a bounded TTL and are edited through `/api/config`.

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod routing;
pub mod store;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Route, RoutingConfig};
pub use store::{ConfigCache, ConfigStore};
