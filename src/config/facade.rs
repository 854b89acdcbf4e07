//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::KvfsConfig;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the global file and environment.
    pub fn load() -> Result<KvfsConfig, ConfigError> {
        MergeService::load()
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<KvfsConfig, ConfigError> {
        MergeService::load_from_file(path)
    }

    /// Load from `path` when given, otherwise from the standard sources.
    pub fn load_optional(path: Option<&Path>) -> Result<KvfsConfig, ConfigError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }

    /// Create default configuration.
    pub fn default() -> KvfsConfig {
        KvfsConfig::default()
    }
}
