//! File and folder node types

use crate::error::ApiError;
use crate::types::{FileId, FolderId};
use data_encoding::BASE64;

/// Where a file record's content comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOrigin {
    /// Shipped with the application, fetched from a static resource locator
    BuiltIn { locator: String },
    /// Supplied by the user and persisted in the key-value store
    User,
}

/// Decoded payload of a user file
#[derive(Debug, Clone, PartialEq)]
pub enum FileData {
    Json(serde_json::Value),
    Binary(Vec<u8>),
}

/// One named blob of content inside a folder
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub id: FileId,
    pub name: String,
    /// Full slash-delimited path of the owning folder, as persisted
    pub folder_path: String,
    pub resource_locator: Option<String>,
    /// Inline text/JSON, or base64 for binary payloads
    pub content: String,
    pub loaded: bool,
}

impl FileRecord {
    /// A built-in record whose content is fetched lazily from `locator`
    pub fn built_in(name: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            id: FileId::BUILT_IN,
            name: name.into(),
            folder_path: String::new(),
            resource_locator: Some(locator.into()),
            content: String::new(),
            loaded: false,
        }
    }

    /// A not-yet-persisted user record; its id is assigned when it is added
    pub fn new_user(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: FileId::BUILT_IN,
            name: name.into(),
            folder_path: String::new(),
            resource_locator: None,
            content: content.into(),
            loaded: true,
        }
    }

    /// A user record from binary data, stored base64-encoded
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new_user(name, BASE64.encode(bytes))
    }

    pub fn is_user_file(&self) -> bool {
        self.id.is_user()
    }

    pub fn origin(&self) -> FileOrigin {
        match (&self.resource_locator, self.is_user_file()) {
            (Some(locator), false) => FileOrigin::BuiltIn {
                locator: locator.clone(),
            },
            _ => FileOrigin::User,
        }
    }

    /// Extension driving content interpretation: taken from the name for
    /// user files and from the resource locator for built-ins.
    pub fn extension(&self) -> Option<&str> {
        let source = if self.is_user_file() {
            self.name.as_str()
        } else {
            self.resource_locator.as_deref().unwrap_or(self.name.as_str())
        };
        source
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty() && !ext.contains('/'))
    }

    pub fn mime_type(&self) -> String {
        match self.extension() {
            Some("json") => "application/json".to_string(),
            Some("jpg") => "image/jpeg".to_string(),
            Some(ext) => format!("image/{}", ext),
            None => "application/octet-stream".to_string(),
        }
    }

    /// Decode the stored payload of a user file
    pub fn file_data(&self) -> Result<FileData, ApiError> {
        if !self.is_user_file() {
            return Err(ApiError::InvalidArgument(format!(
                "File '{}' is built-in and has no stored data",
                self.name
            )));
        }
        if self.extension() == Some("json") {
            let value = serde_json::from_str(&self.content).map_err(|e| {
                ApiError::InvalidArgument(format!("File '{}' is not valid JSON: {}", self.name, e))
            })?;
            Ok(FileData::Json(value))
        } else {
            let bytes = BASE64.decode(self.content.as_bytes()).map_err(|e| {
                ApiError::InvalidArgument(format!(
                    "File '{}' is not valid base64: {}",
                    self.name, e
                ))
            })?;
            Ok(FileData::Binary(bytes))
        }
    }

    /// Fill in content fetched from the resource locator
    pub fn set_loaded_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.loaded = true;
    }

    /// Same-file test: by id for user files, by name otherwise
    pub fn matches(&self, other: &FileRecord) -> bool {
        if other.is_user_file() {
            self.id == other.id
        } else {
            self.name == other.name
        }
    }
}

/// A named container of files and child folders
#[derive(Debug, Clone)]
pub struct FolderNode {
    pub name: String,
    pub files: Vec<FileRecord>,
    pub children: Vec<FolderId>,
    /// Non-owning link, recomputed after every rebuild
    pub parent: Option<FolderId>,
}

impl FolderNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// First file with the given name
    pub fn file(&self, name: &str) -> Option<&FileRecord> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn file_by_id(&self, id: FileId) -> Option<&FileRecord> {
        self.files.iter().find(|f| f.id == id)
    }

    pub fn contains_file(&self, file: &FileRecord) -> bool {
        self.files.iter().any(|f| f.matches(file))
    }
}

/// Folder argument accepted by the facade: a path, or an already resolved handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderRef {
    ByName(String),
    ById(FolderId),
}

impl From<&str> for FolderRef {
    fn from(path: &str) -> Self {
        FolderRef::ByName(path.to_string())
    }
}

impl From<String> for FolderRef {
    fn from(path: String) -> Self {
        FolderRef::ByName(path)
    }
}

impl From<FolderId> for FolderRef {
    fn from(id: FolderId) -> Self {
        FolderRef::ById(id)
    }
}
