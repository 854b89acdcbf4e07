//! Virtual Filesystem facade
//!
//! The single entry point for callers. Composes the namespace tree with the
//! persistence adapter: lookups are answered from the in-memory tree, and
//! every mutation goes to the store and is followed by a full rebuild, so the
//! tree always reflects exactly what persistence holds.
//!
//! Construct one instance at the application boundary and pass it to whoever
//! needs it.

use crate::error::ApiError;
use crate::persistence::{PersistenceAdapter, ReloadReport, StalePathPolicy};
use crate::store::KeyValueStore;
use crate::tree::{BuiltInCatalog, FileRecord, FolderNode, FolderRef, NamespaceTree};
use crate::types::{FileId, FolderId, UNCATEGORIZED};
use data_encoding::BASE64;
use std::sync::Arc;

/// Folder/file namespace over a key-value store
pub struct VirtualFilesystem {
    tree: NamespaceTree,
    adapter: PersistenceAdapter,
    catalog: Arc<dyn BuiltInCatalog>,
    stale_paths: StalePathPolicy,
    last_report: ReloadReport,
}

impl VirtualFilesystem {
    /// Open the filesystem and perform the initial load
    pub fn open(
        store: Arc<dyn KeyValueStore>,
        catalog: Arc<dyn BuiltInCatalog>,
    ) -> Result<Self, ApiError> {
        Self::with_policy(store, catalog, StalePathPolicy::default())
    }

    pub fn with_policy(
        store: Arc<dyn KeyValueStore>,
        catalog: Arc<dyn BuiltInCatalog>,
        stale_paths: StalePathPolicy,
    ) -> Result<Self, ApiError> {
        let mut vfs = Self {
            tree: NamespaceTree::new(),
            adapter: PersistenceAdapter::new(store),
            catalog,
            stale_paths,
            last_report: ReloadReport::default(),
        };
        vfs.reload()?;
        Ok(vfs)
    }

    /// Rebuild the tree from the catalog and the store.
    ///
    /// Invalidates every [`FolderId`] handed out before the call.
    pub fn reload(&mut self) -> Result<&ReloadReport, ApiError> {
        let (tree, report) = self
            .adapter
            .reload(self.catalog.as_ref(), self.stale_paths)?;
        self.tree = tree;
        self.last_report = report;
        Ok(&self.last_report)
    }

    pub fn last_reload_report(&self) -> &ReloadReport {
        &self.last_report
    }

    pub fn tree(&self) -> &NamespaceTree {
        &self.tree
    }

    pub fn next_file_id(&self) -> FileId {
        FileId(self.adapter.metadata().next_id)
    }

    /// Look up a file by name inside a folder; `None` if either is missing
    pub fn get_file(&self, name: &str, folder: impl Into<FolderRef>) -> Option<&FileRecord> {
        let folder = folder.into();
        let Some(id) = self.tree.find_ref(&folder) else {
            tracing::debug!("get_file: could not find folder {:?}", folder);
            return None;
        };
        let file = self.tree.folder(id)?.file(name);
        if file.is_none() {
            tracing::debug!("get_file: could not find file {:?} in folder {:?}", name, folder);
        }
        file
    }

    /// Resolve a folder path, from the roots or from `parent`.
    ///
    /// Folders created here live only in memory until a file is added to them;
    /// the next reload drops empty folders that the catalog does not describe.
    pub fn get_folder(
        &mut self,
        path: &str,
        parent: Option<FolderId>,
        create_if_missing: bool,
    ) -> Option<FolderId> {
        self.tree.resolve(path, parent, create_if_missing)
    }

    /// Resolve a [`FolderRef`] without creating anything
    pub fn find_folder(&self, folder: impl Into<FolderRef>) -> Option<FolderId> {
        self.tree.find_ref(&folder.into())
    }

    pub fn folder(&self, id: FolderId) -> Option<&FolderNode> {
        self.tree.folder(id)
    }

    pub fn list_root_folders(&self) -> &[FolderId] {
        self.tree.roots()
    }

    pub fn list_children(&self, id: FolderId) -> &[FolderId] {
        self.tree.children(id)
    }

    pub fn list_files(&self, id: FolderId) -> &[FileRecord] {
        self.tree.files(id)
    }

    /// Persist a new user file into `folder` and reload. Returns the assigned id.
    pub fn add_file(
        &mut self,
        folder: impl Into<FolderRef>,
        mut record: FileRecord,
    ) -> Result<FileId, ApiError> {
        let folder = folder.into();
        let id = self.tree.find_ref(&folder).ok_or_else(|| {
            ApiError::FolderNotFound(match &folder {
                FolderRef::ByName(path) => path.clone(),
                FolderRef::ById(id) => format!("{:?}", id),
            })
        })?;

        if record.name.trim().is_empty() {
            return Err(ApiError::InvalidArgument(
                "File name cannot be empty".to_string(),
            ));
        }
        if record.is_user_file() {
            return Err(ApiError::InvalidArgument(format!(
                "File '{}' is already stored as {}",
                record.name, record.id
            )));
        }
        if self.tree.files(id).iter().any(|f| f.name == record.name) {
            return Err(ApiError::InvalidArgument(format!(
                "A file named '{}' already exists in this folder",
                record.name
            )));
        }
        let folder_path = self.tree.full_path(id).ok_or_else(|| {
            ApiError::FolderNotFound(format!("{:?}", id))
        })?;

        let file_id = self.adapter.persist_new_file(&folder_path, &mut record)?;
        self.reload()?;
        Ok(file_id)
    }

    /// Add a text (or JSON) file
    pub fn add_file_as_text(
        &mut self,
        folder: impl Into<FolderRef>,
        name: &str,
        text: &str,
    ) -> Result<FileId, ApiError> {
        self.add_file(folder, FileRecord::new_user(name, text))
    }

    /// Add a binary file from already base64-encoded data
    pub fn add_file_as_base64(
        &mut self,
        folder: impl Into<FolderRef>,
        name: &str,
        base64: &str,
    ) -> Result<FileId, ApiError> {
        if let Err(e) = BASE64.decode(base64.as_bytes()) {
            return Err(ApiError::InvalidArgument(format!(
                "Content for '{}' is not valid base64: {}",
                name, e
            )));
        }
        self.add_file(folder, FileRecord::new_user(name, base64))
    }

    /// Overwrite the stored record. Does not reload: call [`reload`](Self::reload)
    /// after changing a record's name or folder so the tree reflects the move.
    pub fn save_file(&self, record: &FileRecord) -> Result<(), ApiError> {
        self.adapter.overwrite(record)
    }

    /// Delete a user file and reload
    pub fn delete_file(&mut self, record: &FileRecord) -> Result<(), ApiError> {
        if !record.is_user_file() {
            return Err(ApiError::InvalidArgument(
                "This file cannot be deleted".to_string(),
            ));
        }
        self.adapter.erase(record)?;
        self.reload()?;
        Ok(())
    }

    /// Number of files in a folder; 0 when the folder does not resolve
    pub fn get_file_count(&self, folder: impl Into<FolderRef>, recursive: bool) -> usize {
        self.tree
            .find_ref(&folder.into())
            .map(|id| self.tree.file_count(id, recursive))
            .unwrap_or(0)
    }

    pub fn get_full_path(&self, id: FolderId) -> Option<String> {
        self.tree.full_path(id)
    }

    pub fn locate_owning_folder(&self, file: &FileRecord) -> Option<FolderId> {
        self.tree.locate_owning_folder(file)
    }

    /// Name of the file's immediate folder, or `"Uncategorized"` when that
    /// folder is a root (or the file is not in the tree).
    pub fn get_category(&self, file: &FileRecord) -> String {
        self.tree
            .locate_owning_folder(file)
            .and_then(|id| self.tree.folder(id))
            .filter(|folder| !folder.is_root())
            .map(|folder| folder.name.clone())
            .unwrap_or_else(|| UNCATEGORIZED.to_string())
    }

    /// Find a loaded file anywhere in the tree by id
    pub fn get_file_by_id(&self, id: FileId) -> Option<&FileRecord> {
        self.tree
            .flatten()
            .into_iter()
            .find_map(|folder| self.tree.folder(folder)?.file_by_id(id))
    }

    /// Read one record straight from the store, bypassing the tree
    pub fn load_file_by_id(&self, id: FileId) -> Result<Option<FileRecord>, ApiError> {
        self.adapter.load_file_by_id(id)
    }
}
