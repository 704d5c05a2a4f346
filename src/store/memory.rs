//! In-memory config store backed by a `HashMap` behind a `Mutex`.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::routing::RoutingConfig;
use crate::store::{ConfigStore, StoreError};

/// A process-local [`ConfigStore`] for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct InMemoryConfigStore {
    data: Mutex<HashMap<String, RoutingConfig>>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `config` under `key`.
    pub fn with_config(key: &str, config: RoutingConfig) -> Self {
        let store = Self::new();
        if let Ok(mut data) = store.data.lock() {
            data.insert(key.to_string(), config);
        }
        store
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn get(&self, key: &str) -> Result<Option<RoutingConfig>, StoreError> {
        Ok(self.data.lock().map_err(poisoned)?.get(key).cloned())
    }

    async fn set(&self, key: &str, config: &RoutingConfig) -> Result<(), StoreError> {
        self.data
            .lock()
            .map_err(poisoned)?
            .insert(key.to_string(), config.clone());
        Ok(())
    }
}
