//! Sled-backed store implementation

use super::KeyValueStore;
use crate::error::StorageError;
use std::path::Path;

/// Key-value store persisted in a sled database
#[derive(Clone)]
pub struct SledStore {
    db: sled::Db,
}

impl SledStore {
    /// Open (or create) a database at `path`
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(path)?;
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// A database that is deleted when dropped
    pub fn temporary() -> Result<Self, StorageError> {
        let db = sled::Config::default().temporary(true).open()?;
        Ok(Self { db })
    }

    /// Wrap an already opened database
    pub fn from_db(db: sled::Db) -> Self {
        Self { db }
    }

    fn decode(key: &str, bytes: &[u8]) -> Result<String, StorageError> {
        String::from_utf8(bytes.to_vec()).map_err(|e| StorageError::InvalidValue {
            key: key.to_string(),
            reason: format!("value is not UTF-8: {}", e),
        })
    }
}

impl KeyValueStore for SledStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.db.get(key.as_bytes())? {
            Some(ivec) => Ok(Some(Self::decode(key, &ivec)?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.db.insert(key.as_bytes(), value.as_bytes())?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.db.remove(key.as_bytes())?;
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        for entry in self.db.scan_prefix(prefix.as_bytes()) {
            let (key, _) = entry?;
            match String::from_utf8(key.to_vec()) {
                Ok(key) => keys.push(key),
                Err(e) => {
                    tracing::warn!("Skipping non UTF-8 key under prefix {}: {}", prefix, e);
                }
            }
        }
        Ok(keys)
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        new: &str,
    ) -> Result<bool, StorageError> {
        let result = self.db.compare_and_swap(
            key.as_bytes(),
            expected.map(str::as_bytes),
            Some(new.as_bytes()),
        )?;
        Ok(result.is_ok())
    }

    fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }
}
