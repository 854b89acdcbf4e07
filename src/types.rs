//! Core identifier types for the virtual filesystem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a file record.
///
/// `0` marks a built-in record that is never persisted; every user-supplied
/// record carries an id greater than zero, allocated once and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub u64);

impl FileId {
    pub const BUILT_IN: FileId = FileId(0);

    pub fn is_user(self) -> bool {
        self.0 > 0
    }

    /// Store key holding the serialized record for this id.
    pub fn store_key(self) -> String {
        format!("{}{}", FILE_KEY_PREFIX, self.0)
    }

    /// Parse an id back out of a record key, if the key has the record shape.
    pub fn from_store_key(key: &str) -> Option<FileId> {
        key.strip_prefix(FILE_KEY_PREFIX)
            .and_then(|rest| rest.parse::<u64>().ok())
            .map(FileId)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Arena handle of a folder inside a [`NamespaceTree`](crate::tree::NamespaceTree).
///
/// Handles are only meaningful for the tree that issued them and are invalidated
/// by every reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FolderId(pub(crate) usize);

impl FolderId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Key prefix for persisted user records.
pub const FILE_KEY_PREFIX: &str = "file_";

/// Key holding the adapter metadata (the id counter).
pub const METADATA_KEY: &str = "fileSystem";

/// Category reported for files that sit directly in a root folder.
pub const UNCATEGORIZED: &str = "Uncategorized";
