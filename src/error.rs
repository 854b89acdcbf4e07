//! Error types for the virtual filesystem.
//!
//! Lookups never produce errors: a folder or file that cannot be found is an
//! `Option::None`. Errors are reserved for mutations that violate an invariant
//! and for failures of the underlying key-value store.

use thiserror::Error;

/// Failures raised by a [`KeyValueStore`](crate::store::KeyValueStore) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("invalid value stored under {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        match err {
            sled::Error::Io(io) => StorageError::IoError(io),
            other => StorageError::Backend(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Errors surfaced by the filesystem facade and its supporting layers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The caller passed something that violates an invariant; nothing was changed.
    #[error("{0}")]
    InvalidArgument(String),

    #[error("folder not found: {0}")]
    FolderNotFound(String),

    #[error("file not found: {name} in folder {folder}")]
    FileNotFound { folder: String, name: String },

    #[error("could not allocate a file id after {0} attempts (concurrent writer?)")]
    IdAllocationConflict(u32),

    #[error("file id space exhausted: no id above {0} is available")]
    IdSpaceExhausted(u64),

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ApiError {
    /// True when the error is a rejection of caller input rather than an
    /// infrastructure failure.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            ApiError::InvalidArgument(_)
                | ApiError::FolderNotFound(_)
                | ApiError::FileNotFound { .. }
        )
    }
}
