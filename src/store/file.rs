//! JSON-file-backed config store.
//!
//! The file holds one JSON object mapping store keys to configs:
//! `{"proxy_config_v1":{"routes":[...]}}`. Writes go to a sibling temp
//! file and are renamed into place so readers never see a partial document.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::routing::RoutingConfig;
use crate::store::{ConfigStore, StoreError};

type Document = BTreeMap<String, RoutingConfig>;

/// A [`ConfigStore`] persisted as a single JSON document.
#[derive(Debug)]
pub struct FileConfigStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileConfigStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_document(&self) -> Result<Document, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Document::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Document::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save_document(&self, document: &Document) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(document)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn get(&self, key: &str) -> Result<Option<RoutingConfig>, StoreError> {
        let mut document = self.load_document().await?;
        Ok(document.remove(key))
    }

    async fn set(&self, key: &str, config: &RoutingConfig) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load_document().await?;
        document.insert(key.to_string(), config.clone());
        self.save_document(&document).await?;
        tracing::debug!(path = %self.path.display(), key, routes = config.routes.len(), "Config persisted");
        Ok(())
    }
}
