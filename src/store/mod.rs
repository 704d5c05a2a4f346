//! Route configuration persistence.
//!
//! # Data Flow
//! ```text
//! proxy handler / config API
//!     → cache.rs (ConfigCache: TTL-bounded snapshot, write-through)
//!     → ConfigStore (get/set under one fixed key)
//!         → memory.rs (process-local, tests)
//!         → file.rs (JSON document on disk)
//! ```
//!
//! # Design Decisions
//! - The store is an opaque async get/set service behind a trait
//! - Reads are cached for a bounded TTL; writes go through the store first
//! - Store read failures degrade to "no routes" for proxy traffic

pub mod cache;
pub mod file;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::schema::{StoreBackend, StoreConfig};
use crate::routing::RoutingConfig;

pub use cache::ConfigCache;
pub use file::FileConfigStore;
pub use memory::InMemoryConfigStore;

/// Errors surfaced by a [`ConfigStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored config is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Durable key/value persistence for [`RoutingConfig`].
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load the config stored under `key`, `None` if nothing was ever saved.
    async fn get(&self, key: &str) -> Result<Option<RoutingConfig>, StoreError>;

    /// Replace the config stored under `key`.
    async fn set(&self, key: &str, config: &RoutingConfig) -> Result<(), StoreError>;
}

/// Build the store selected in configuration.
pub fn from_config(config: &StoreConfig) -> Arc<dyn ConfigStore> {
    match config.backend {
        StoreBackend::File => {
            tracing::info!(path = %config.path.display(), "Using file-backed config store");
            Arc::new(FileConfigStore::new(&config.path))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory config store; routes are lost on restart");
            Arc::new(InMemoryConfigStore::new())
        }
    }
}
