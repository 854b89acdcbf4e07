//! Persistence Adapter
//!
//! Maps file records onto the key-value store and rebuilds the namespace tree
//! from it. The store holds one metadata key with the id counter and one key per
//! user record (`file_<id>`); built-in content is never written.
//!
//! Ids come from a monotonically increasing counter that is never decremented,
//! so a deleted record's key can never be handed to a new file.

use crate::error::ApiError;
use crate::store::KeyValueStore;
use crate::tree::{split_path, BuiltInCatalog, FileRecord, NamespaceTree};
use crate::types::{FileId, FolderId, FILE_KEY_PREFIX, METADATA_KEY, UNCATEGORIZED};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Attempts at the counter compare-and-swap before giving up
pub const MAX_ALLOCATION_ATTEMPTS: u32 = 16;

/// Adapter metadata persisted under [`METADATA_KEY`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "nextId", alias = "nextFileId")]
    pub next_id: u64,
}

impl Default for Metadata {
    fn default() -> Self {
        Self { next_id: 1 }
    }
}

/// Serialized form of one user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub name: String,
    #[serde(rename = "folderPath", alias = "folder", default)]
    pub folder_path: String,
    #[serde(alias = "contents", alias = "data", default)]
    pub content: String,
}

impl StoredFile {
    fn from_record(record: &FileRecord) -> Self {
        Self {
            name: record.name.clone(),
            folder_path: record.folder_path.clone(),
            content: record.content.clone(),
        }
    }

    fn into_record(self, id: FileId) -> FileRecord {
        FileRecord {
            id,
            name: self.name,
            folder_path: self.folder_path,
            resource_locator: None,
            content: self.content,
            loaded: true,
        }
    }
}

/// What to do with a record whose stored folder path no longer resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePathPolicy {
    /// Re-create the stored folder path
    #[default]
    Recreate,
    /// Attach the record to the first root folder
    FirstRoot,
}

/// Outcome of one reload; lists every record that needed recovery
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReloadReport {
    pub loaded: usize,
    /// Records whose folder path was re-created: (id, stored path)
    pub recreated: Vec<(FileId, String)>,
    /// Records attached to a fallback root: (id, stored path)
    pub relocated: Vec<(FileId, String)>,
    /// Ids whose stored JSON could not be parsed
    pub corrupt: Vec<FileId>,
    /// Record keys at or above the id counter
    pub orphaned: Vec<FileId>,
}

impl ReloadReport {
    pub fn is_clean(&self) -> bool {
        self.recreated.is_empty()
            && self.relocated.is_empty()
            && self.corrupt.is_empty()
            && self.orphaned.is_empty()
    }
}

/// Loads and saves file records against a [`KeyValueStore`]
pub struct PersistenceAdapter {
    store: Arc<dyn KeyValueStore>,
    metadata: Metadata,
}

impl PersistenceAdapter {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            metadata: Metadata::default(),
        }
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Metadata as of the last load or allocation
    pub fn metadata(&self) -> Metadata {
        self.metadata
    }

    /// Read the id counter from the store.
    ///
    /// A missing key means a fresh store. Metadata that cannot be parsed is
    /// reset to the default, raised past any record keys already present so a
    /// reset counter never hands out a live id.
    pub fn load_metadata(&mut self) -> Result<Metadata, ApiError> {
        let raw = self.store.get(METADATA_KEY)?;
        self.metadata = self.decode_metadata(raw.as_deref())?;
        Ok(self.metadata)
    }

    fn decode_metadata(&self, raw: Option<&str>) -> Result<Metadata, ApiError> {
        let Some(raw) = raw else {
            return Ok(Metadata::default());
        };
        match serde_json::from_str::<Metadata>(raw) {
            Ok(meta) if meta.next_id > 0 => Ok(meta),
            Ok(meta) => {
                tracing::warn!(
                    "Stored metadata has invalid nextId {}, resetting counter",
                    meta.next_id
                );
                self.recovered_metadata()
            }
            Err(e) => {
                tracing::warn!("Corrupt filesystem metadata ({}), resetting counter", e);
                self.recovered_metadata()
            }
        }
    }

    fn recovered_metadata(&self) -> Result<Metadata, ApiError> {
        let highest = self
            .store
            .keys_with_prefix(FILE_KEY_PREFIX)?
            .iter()
            .filter_map(|key| FileId::from_store_key(key))
            .map(|id| id.0)
            .max()
            .unwrap_or(0);
        // a record at u64::MAX stays orphaned; allocation then reports exhaustion
        Ok(Metadata {
            next_id: highest.saturating_add(1),
        })
    }

    /// Assign the next id to `record`, persist the counter, then the record.
    ///
    /// The counter is advanced with a compare-and-swap before the record is
    /// written, so a crash in between leaves a gap in the id sequence rather
    /// than a record the counter does not cover.
    pub fn persist_new_file(
        &mut self,
        folder_path: &str,
        record: &mut FileRecord,
    ) -> Result<FileId, ApiError> {
        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let raw = self.store.get(METADATA_KEY)?;
            let current = self.decode_metadata(raw.as_deref())?;

            let mut candidate = current.next_id;
            while self.store.get(&FileId(candidate).store_key())?.is_some() {
                tracing::warn!(
                    "Record key for id {} already exists above the counter, skipping it",
                    candidate
                );
                candidate = candidate
                    .checked_add(1)
                    .ok_or(ApiError::IdSpaceExhausted(candidate))?;
            }

            let next = Metadata {
                next_id: candidate
                    .checked_add(1)
                    .ok_or(ApiError::IdSpaceExhausted(candidate))?,
            };
            let encoded = serde_json::to_string(&next).map_err(crate::error::StorageError::from)?;
            if !self
                .store
                .compare_and_swap(METADATA_KEY, raw.as_deref(), &encoded)?
            {
                tracing::debug!(attempt, "Id counter changed underneath us, retrying");
                continue;
            }

            self.metadata = next;
            record.id = FileId(candidate);
            record.folder_path = folder_path.to_string();
            record.resource_locator = None;
            record.loaded = true;
            self.write_record(record)?;
            self.store.flush()?;

            tracing::info!(
                "Stored {} named {:?} in folder {:?}",
                record.id,
                record.name,
                record.folder_path
            );
            return Ok(record.id);
        }
        Err(ApiError::IdAllocationConflict(MAX_ALLOCATION_ATTEMPTS))
    }

    /// Rewrite the stored blob of an existing user record.
    ///
    /// The id must have been allocated and its key must still be present, so a
    /// stale copy of a deleted record cannot bring it back.
    pub fn overwrite(&self, record: &FileRecord) -> Result<(), ApiError> {
        if !record.is_user_file() {
            return Err(ApiError::InvalidArgument(format!(
                "File '{}' is built-in and cannot be saved",
                record.name
            )));
        }
        if record.id.0 >= self.metadata.next_id {
            return Err(ApiError::InvalidArgument(format!(
                "File '{}' has id {} which was never allocated",
                record.name, record.id
            )));
        }
        if self.store.get(&record.id.store_key())?.is_none() {
            return Err(ApiError::FileNotFound {
                folder: record.folder_path.clone(),
                name: record.name.clone(),
            });
        }
        self.write_record(record)?;
        self.store.flush()?;
        Ok(())
    }

    /// Remove a user record. The id counter is left untouched.
    pub fn erase(&self, record: &FileRecord) -> Result<(), ApiError> {
        if !record.is_user_file() {
            return Err(ApiError::InvalidArgument(
                "This file cannot be deleted".to_string(),
            ));
        }
        self.store.remove(&record.id.store_key())?;
        self.store.flush()?;
        tracing::info!("Deleted {} named {:?}", record.id, record.name);
        Ok(())
    }

    /// Fetch one stored record directly; `None` if it was never written or was deleted
    pub fn load_file_by_id(&self, id: FileId) -> Result<Option<FileRecord>, ApiError> {
        if !id.is_user() {
            return Ok(None);
        }
        let Some(raw) = self.store.get(&id.store_key())? else {
            return Ok(None);
        };
        let stored: StoredFile =
            serde_json::from_str(&raw).map_err(crate::error::StorageError::from)?;
        Ok(Some(stored.into_record(id)))
    }

    /// Every stored user record below the counter, plus the ids that failed to parse
    pub fn scan_user_files(&self) -> Result<(Vec<FileRecord>, Vec<FileId>), ApiError> {
        let mut files = Vec::new();
        let mut corrupt = Vec::new();
        let mut ids: Vec<FileId> = self
            .store
            .keys_with_prefix(FILE_KEY_PREFIX)?
            .iter()
            .filter_map(|key| FileId::from_store_key(key))
            .filter(|id| id.is_user() && id.0 < self.metadata.next_id)
            .collect();
        ids.sort();
        ids.dedup();
        for id in ids {
            // non-canonical keys such as file_01 map to an absent file_1
            let Some(raw) = self.store.get(&id.store_key())? else {
                continue;
            };
            match serde_json::from_str::<StoredFile>(&raw) {
                Ok(stored) => files.push(stored.into_record(id)),
                Err(e) => {
                    tracing::error!("Skipping unreadable record {}: {}", id, e);
                    corrupt.push(id);
                }
            }
        }
        Ok((files, corrupt))
    }

    /// Record keys the counter does not cover
    pub fn orphaned_ids(&self) -> Result<Vec<FileId>, ApiError> {
        let next_id = self.metadata.next_id;
        let mut ids: Vec<FileId> = self
            .store
            .keys_with_prefix(FILE_KEY_PREFIX)?
            .iter()
            .filter_map(|key| FileId::from_store_key(key))
            .filter(|id| id.0 >= next_id)
            .collect();
        ids.sort();
        Ok(ids)
    }

    /// Rebuild the whole tree: built-in structure first, then every stored record.
    pub fn reload(
        &mut self,
        catalog: &dyn BuiltInCatalog,
        policy: StalePathPolicy,
    ) -> Result<(NamespaceTree, ReloadReport), ApiError> {
        self.load_metadata()?;
        let mut tree = catalog.build();
        let mut report = ReloadReport::default();

        let (files, corrupt) = self.scan_user_files()?;
        report.corrupt = corrupt;

        for mut file in files {
            let target = match tree.find(&file.folder_path, None) {
                Some(id) => id,
                None => {
                    let stored_path = file.folder_path.clone();
                    let recreated = match policy {
                        StalePathPolicy::Recreate if split_path(&stored_path).is_some() => {
                            tree.resolve(&stored_path, None, true)
                        }
                        _ => None,
                    };
                    match recreated {
                        Some(id) => {
                            tracing::warn!(
                                "Re-created folder {:?} for user file {} named {:?}",
                                stored_path,
                                file.id,
                                file.name
                            );
                            report.recreated.push((file.id, stored_path));
                            id
                        }
                        None => {
                            let id = fallback_root(&mut tree);
                            tracing::warn!(
                                "Could not find folder {:?} for user file {} named {:?}, attaching to first root",
                                stored_path,
                                file.id,
                                file.name
                            );
                            report.relocated.push((file.id, stored_path));
                            id
                        }
                    }
                }
            };

            if let Some(path) = tree.full_path(target) {
                file.folder_path = path;
            }
            tracing::debug!(
                "Loaded {} named {:?} from folder {:?}",
                file.id,
                file.name,
                file.folder_path
            );
            tree.attach_file(target, file);
            report.loaded += 1;
        }

        tree.relink_parents();

        report.orphaned = self.orphaned_ids()?;
        if !report.orphaned.is_empty() {
            tracing::warn!(
                "Found {} record(s) above the id counter: {:?}",
                report.orphaned.len(),
                report.orphaned
            );
        }

        tracing::info!(
            loaded = report.loaded,
            folders = tree.folder_count(),
            next_id = self.metadata.next_id,
            "Reloaded filesystem"
        );
        Ok((tree, report))
    }

    fn write_record(&self, record: &FileRecord) -> Result<(), ApiError> {
        let serialized = serde_json::to_string(&StoredFile::from_record(record))
            .map_err(crate::error::StorageError::from)?;
        self.store.set(&record.id.store_key(), &serialized)?;
        Ok(())
    }
}

/// First root folder, creating an "Uncategorized" root when the tree has none
fn fallback_root(tree: &mut NamespaceTree) -> FolderId {
    match tree.roots().first() {
        Some(first) => *first,
        None => tree.add_root(UNCATEGORIZED),
    }
}
