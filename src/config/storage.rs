//! StorageConfig and store path resolution.

use crate::config::paths::xdg_root;
use crate::error::ApiError;
use crate::persistence::StalePathPolicy;
use crate::store::{KeyValueStore, MemoryStore, SledStore};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Key-value backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Sled,
    Memory,
}

/// Storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Database directory; None means `$XDG_DATA_HOME/kvfs/store`
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Handling of records whose folder path no longer resolves
    #[serde(default)]
    pub stale_paths: StalePathPolicy,
}

impl StorageConfig {
    /// Resolve the database directory
    pub fn resolve_path(&self) -> Result<PathBuf, ApiError> {
        if let Some(path) = &self.path {
            if !path.as_os_str().is_empty() {
                return Ok(path.clone());
            }
        }
        Ok(xdg_root::data_dir()?.join("store"))
    }

    /// Open the configured store
    pub fn open_store(&self) -> Result<Arc<dyn KeyValueStore>, ApiError> {
        match self.backend {
            StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
            StorageBackend::Sled => {
                let path = self.resolve_path()?;
                tracing::debug!("Opening sled store at {}", path.display());
                Ok(Arc::new(SledStore::open(&path)?))
            }
        }
    }
}
