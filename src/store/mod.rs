//! String Key-Value Store
//!
//! The persistence boundary of the filesystem. Everything the filesystem keeps
//! lives under string keys with string (JSON) values; the backend decides where
//! those bytes actually go.

pub mod memory;
pub mod persistence;

pub use memory::MemoryStore;
pub use persistence::SledStore;

use crate::error::StorageError;

/// Synchronous string key-value store interface
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key. Removing a key that does not exist is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// All keys starting with `prefix`, in ascending byte order.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError>;

    /// Atomically replace the value under `key` when it currently equals
    /// `expected` (`None` meaning "absent").
    ///
    /// Returns `Ok(false)` without writing when the current value differs.
    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        new: &str,
    ) -> Result<bool, StorageError>;

    /// Flush any buffered writes to durable storage. Default implementation is a no-op.
    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
