//! Configuration
//!
//! Layered configuration for the filesystem: built-in defaults, an optional
//! global config file, an optional explicit file, then `KVFS__*` environment
//! variables (highest precedence).

mod facade;
pub mod merge;
pub mod paths;
pub mod sources;
pub mod storage;

pub use facade::ConfigLoader;
pub use storage::{StorageBackend, StorageConfig};

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::tree::Catalog;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the built-in catalog comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSource {
    /// The bundled color-picker catalog
    #[default]
    Default,
    /// No built-in content at all
    Empty,
    /// A TOML catalog file named by `path`
    File,
}

/// Catalog configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub source: CatalogSource,

    /// Catalog file when `source = "file"`
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl CatalogConfig {
    pub fn load(&self) -> Result<Catalog, ApiError> {
        match self.source {
            CatalogSource::Default => Ok(Catalog::default_palette()),
            CatalogSource::Empty => Ok(Catalog::empty()),
            CatalogSource::File => {
                let path = self.path.as_ref().ok_or_else(|| {
                    ApiError::ConfigError(
                        "catalog.source = \"file\" requires catalog.path".to_string(),
                    )
                })?;
                Catalog::load_from_file(path)
            }
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KvfsConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}
