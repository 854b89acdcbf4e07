//! Namespace Tree
//!
//! The in-memory folder hierarchy. Folders live in an arena owned by the tree
//! and refer to each other through [`FolderId`] handles; there is no single
//! implicit root, only an ordered list of named root folders.
//!
//! Parent links are derived data: [`NamespaceTree::relink_parents`] recomputes
//! all of them from the child lists in one pass after every structural rebuild.

pub mod catalog;
pub mod node;

pub use catalog::{BuiltInCatalog, Catalog, CatalogEntry};
pub use node::{FileData, FileOrigin, FileRecord, FolderNode, FolderRef};

use crate::types::FolderId;
use std::collections::VecDeque;

/// Arena-backed folder hierarchy
#[derive(Debug, Clone, Default)]
pub struct NamespaceTree {
    nodes: Vec<FolderNode>,
    roots: Vec<FolderId>,
}

impl NamespaceTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roots(&self) -> &[FolderId] {
        &self.roots
    }

    pub fn folder(&self, id: FolderId) -> Option<&FolderNode> {
        self.nodes.get(id.0)
    }

    pub(crate) fn folder_mut(&mut self, id: FolderId) -> Option<&mut FolderNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn children(&self, id: FolderId) -> &[FolderId] {
        self.folder(id).map(|f| f.children.as_slice()).unwrap_or(&[])
    }

    pub fn files(&self, id: FolderId) -> &[FileRecord] {
        self.folder(id).map(|f| f.files.as_slice()).unwrap_or(&[])
    }

    pub fn folder_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_root(&self, id: FolderId) -> bool {
        self.folder(id).map(FolderNode::is_root).unwrap_or(false)
    }

    /// Resolve a slash-delimited path to a folder.
    ///
    /// The walk starts from the root list, or from the children of `start` when
    /// given. Segment matching is exact and case-sensitive; among duplicate
    /// sibling names the first in insertion order wins. With `create_if_missing`
    /// every missing segment is created as an empty folder, so a whole
    /// multi-level path can come into existence in one call.
    ///
    /// An empty path, or one with empty segments, is reported and yields `None`.
    pub fn resolve(
        &mut self,
        path: &str,
        start: Option<FolderId>,
        create_if_missing: bool,
    ) -> Option<FolderId> {
        let segments = match split_path(path) {
            Some(segments) => segments,
            None => {
                tracing::error!("resolve: invalid folder path {:?}", path);
                return None;
            }
        };
        if let Some(start) = start {
            if self.folder(start).is_none() {
                tracing::error!("resolve: unknown starting folder {:?}", start);
                return None;
            }
        }

        let mut current = start;
        let mut created = false;
        for segment in segments {
            let found = self
                .level(current)
                .iter()
                .copied()
                .find(|id| self.nodes[id.0].name == segment);
            current = Some(match found {
                Some(id) => id,
                None if create_if_missing => {
                    created = true;
                    self.insert_folder(current, segment)
                }
                None => return None,
            });
        }
        if created {
            self.relink_parents();
        }
        current
    }

    /// Read-only resolution; never creates folders.
    pub fn find(&self, path: &str, start: Option<FolderId>) -> Option<FolderId> {
        let segments = split_path(path)?;
        if let Some(start) = start {
            self.folder(start)?;
        }
        let mut current = start;
        for segment in segments {
            current = Some(
                self.level(current)
                    .iter()
                    .copied()
                    .find(|id| self.nodes[id.0].name == segment)?,
            );
        }
        current
    }

    /// Resolve a [`FolderRef`] without creating anything.
    ///
    /// A handle is re-validated through its full path rather than trusted, so a
    /// handle from another tree or a previous reload cannot alias a live folder
    /// it does not name.
    pub fn find_ref(&self, folder: &FolderRef) -> Option<FolderId> {
        match folder {
            FolderRef::ByName(path) => self.find(path, None),
            FolderRef::ById(id) => {
                let path = self.full_path(*id)?;
                self.find(&path, None).filter(|found| found == id)
            }
        }
    }

    /// Every folder in breadth-first order, roots first.
    pub fn flatten(&self) -> Vec<FolderId> {
        let mut ordered = Vec::with_capacity(self.nodes.len());
        let mut queue: VecDeque<FolderId> = self.roots.iter().copied().collect();
        while let Some(id) = queue.pop_front() {
            ordered.push(id);
            queue.extend(self.children(id).iter().copied());
        }
        ordered
    }

    /// First folder (in [`flatten`](Self::flatten) order) holding `file`.
    pub fn locate_owning_folder(&self, file: &FileRecord) -> Option<FolderId> {
        self.flatten()
            .into_iter()
            .find(|id| self.nodes[id.0].contains_file(file))
    }

    /// Recompute every parent link from the child lists.
    pub fn relink_parents(&mut self) {
        for node in &mut self.nodes {
            node.parent = None;
        }
        let mut stack: Vec<FolderId> = self.roots.clone();
        while let Some(id) = stack.pop() {
            let children = self.nodes[id.0].children.clone();
            for child in children {
                self.nodes[child.0].parent = Some(id);
                stack.push(child);
            }
        }
    }

    /// `/`-joined names from the folder's root down to the folder itself.
    pub fn full_path(&self, id: FolderId) -> Option<String> {
        let mut names = vec![self.folder(id)?.name.as_str()];
        let mut parent = self.nodes[id.0].parent;
        // a well-formed tree can never be deeper than its node count
        let mut remaining = self.nodes.len();
        while let Some(p) = parent {
            if remaining == 0 {
                tracing::error!("full_path: parent cycle detected at {:?}", id);
                return None;
            }
            remaining -= 1;
            let node = self.folder(p)?;
            names.push(node.name.as_str());
            parent = node.parent;
        }
        names.reverse();
        Some(names.join("/"))
    }

    pub fn file_count(&self, id: FolderId, recursive: bool) -> usize {
        let Some(folder) = self.folder(id) else {
            return 0;
        };
        let mut count = folder.files.len();
        if recursive {
            count += folder
                .children
                .iter()
                .map(|child| self.file_count(*child, true))
                .sum::<usize>();
        }
        count
    }

    /// Append a file to a folder. Returns false when the folder does not exist.
    pub fn attach_file(&mut self, id: FolderId, file: FileRecord) -> bool {
        match self.folder_mut(id) {
            Some(folder) => {
                folder.files.push(file);
                true
            }
            None => false,
        }
    }

    /// Append a new, empty root folder
    pub(crate) fn add_root(&mut self, name: &str) -> FolderId {
        let id = self.insert_folder(None, name);
        self.relink_parents();
        id
    }

    fn level(&self, parent: Option<FolderId>) -> &[FolderId] {
        match parent {
            Some(id) => &self.nodes[id.0].children,
            None => &self.roots,
        }
    }

    /// Parent links are left unset; callers run [`relink_parents`](Self::relink_parents).
    fn insert_folder(&mut self, parent: Option<FolderId>, name: &str) -> FolderId {
        let id = FolderId(self.nodes.len());
        self.nodes.push(FolderNode::new(name));
        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }
}

/// Split a folder path into segments; `None` when the path or any segment is empty.
pub(crate) fn split_path(path: &str) -> Option<Vec<&str>> {
    if path.is_empty() {
        return None;
    }
    let segments: Vec<&str> = path.split('/').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return None;
    }
    Some(segments)
}
