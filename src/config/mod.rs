//! Process settings.
//!
//! # Data Flow
//! ```text
//! optional TOML file
//!     → loader.rs (read, deserialize, apply ADMIN_PASSWORD)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → handed to startup, pieces shared via AppState
//! ```
//!
//! Routing rules are not part of this file: they live in the config store
//! and are edited at runtime through `/api/config`.
//!
//! # Design Decisions
//! - Every section has defaults, so an empty or missing file is valid
//! - Validation reports all errors, not just the first

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AdminConfig, CacheConfig, ListenerConfig, ObservabilityConfig, ProxyConfig, StoreBackend,
    StoreConfig, UpstreamConfig,
};
pub use validation::ValidationError;
