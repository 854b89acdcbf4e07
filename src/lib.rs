//! kvfs: Key-Value Backed Virtual Filesystem
//!
//! A hierarchical folder/file namespace whose user records live in a string
//! key-value store, merged at load time with read-only built-in content from a
//! static catalog. The tree is rebuilt from scratch on open and after every
//! mutation, so it always mirrors exactly what the store holds.

pub mod config;
pub mod error;
pub mod logging;
pub mod persistence;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod types;
pub mod vfs;

pub use error::{ApiError, StorageError};
pub use persistence::{PersistenceAdapter, ReloadReport, StalePathPolicy};
pub use store::{KeyValueStore, MemoryStore, SledStore};
pub use tree::{Catalog, FileRecord, FolderNode, FolderRef, NamespaceTree};
pub use types::{FileId, FolderId, UNCATEGORIZED};
pub use vfs::VirtualFilesystem;
