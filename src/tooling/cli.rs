//! CLI Tooling
//!
//! Command-line interface over a [`VirtualFilesystem`]: browse folders, add,
//! read and delete user files, and inspect reload diagnostics.

use crate::config::{ConfigLoader, KvfsConfig};
use crate::error::ApiError;
use crate::tree::{FileData, FileOrigin, FileRecord};
use crate::types::FolderId;
use crate::vfs::VirtualFilesystem;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use serde_json::json;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

/// kvfs CLI - virtual folders over a key-value store
#[derive(Parser)]
#[command(name = "kvfs")]
#[command(about = "Browse and edit a key-value backed virtual filesystem")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Store directory (overrides storage.path)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the whole folder tree with file counts
    Tree,
    /// List the files of a folder
    Ls {
        /// Folder path, e.g. "Named Colors/Modern"
        folder: String,
        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Count files in a folder
    Count {
        folder: String,
        /// Include all descendant folders
        #[arg(long)]
        recursive: bool,
    },
    /// Add a user file
    Add {
        folder: String,
        name: String,
        /// Inline text content
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        /// Read content from a local file (binary data is stored as base64)
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Print a file's content
    Cat { folder: String, name: String },
    /// Delete a user file
    Rm { folder: String, name: String },
    /// Show the category of a file
    Category { folder: String, name: String },
    /// Show diagnostics from the last reload
    Doctor,
}

/// CLI context owning the filesystem instance
pub struct CliContext {
    vfs: VirtualFilesystem,
}

impl CliContext {
    /// Load configuration and open the filesystem
    pub fn new(config_path: Option<PathBuf>, store: Option<PathBuf>) -> Result<Self, ApiError> {
        let mut config = ConfigLoader::load_optional(config_path.as_deref())?;
        if store.is_some() {
            config.storage.path = store;
        }
        Self::from_config(&config)
    }

    pub fn from_config(config: &KvfsConfig) -> Result<Self, ApiError> {
        let store = config.storage.open_store()?;
        let catalog = Arc::new(config.catalog.load()?);
        let vfs = VirtualFilesystem::with_policy(store, catalog, config.storage.stale_paths)?;
        Ok(Self { vfs })
    }

    pub fn vfs(&self) -> &VirtualFilesystem {
        &self.vfs
    }

    /// Execute a CLI command
    pub fn execute(&mut self, command: &Commands) -> Result<String, ApiError> {
        tracing::debug!(?command, "Executing command");
        match command {
            Commands::Tree => Ok(self.render_tree()),
            Commands::Ls { folder, format } => self.list(folder, format),
            Commands::Count { folder, recursive } => Ok(self
                .vfs
                .get_file_count(folder.as_str(), *recursive)
                .to_string()),
            Commands::Add {
                folder,
                name,
                text,
                file,
            } => self.add(folder, name, text.as_deref(), file.as_ref()),
            Commands::Cat { folder, name } => {
                let record = self.require_file(folder, name)?;
                render_content(record)
            }
            Commands::Rm { folder, name } => {
                let record = self.require_file(folder, name)?.clone();
                self.vfs.delete_file(&record)?;
                Ok(format!("Deleted {} {}", record.id, record.name))
            }
            Commands::Category { folder, name } => {
                let record = self.require_file(folder, name)?;
                Ok(self.vfs.get_category(record))
            }
            Commands::Doctor => Ok(self.render_report()),
        }
    }

    fn require_file(&self, folder: &str, name: &str) -> Result<&FileRecord, ApiError> {
        self.vfs
            .get_file(name, folder)
            .ok_or_else(|| ApiError::FileNotFound {
                folder: folder.to_string(),
                name: name.to_string(),
            })
    }

    fn list(&self, folder: &str, format: &str) -> Result<String, ApiError> {
        let id = self
            .vfs
            .find_folder(folder)
            .ok_or_else(|| ApiError::FolderNotFound(folder.to_string()))?;
        let files = self.vfs.list_files(id);
        match format {
            "json" => {
                let rows: Vec<_> = files
                    .iter()
                    .map(|f| {
                        json!({
                            "id": f.id.0,
                            "name": f.name,
                            "mime_type": f.mime_type(),
                            "category": self.vfs.get_category(f),
                            "built_in": !f.is_user_file(),
                        })
                    })
                    .collect();
                serde_json::to_string_pretty(&rows)
                    .map_err(|e| ApiError::InvalidArgument(format!("Failed to render JSON: {}", e)))
            }
            "text" => {
                let mut table = Table::new();
                table.load_preset(comfy_table::presets::UTF8_FULL);
                table.set_header(vec!["Id", "Name", "Type", "Source"]);
                for f in files {
                    let id = if f.is_user_file() {
                        f.id.0.to_string()
                    } else {
                        "-".to_string()
                    };
                    let source = match f.origin() {
                        FileOrigin::BuiltIn { locator } => locator,
                        FileOrigin::User => "user".to_string(),
                    };
                    table.add_row(vec![id, f.name.clone(), f.mime_type(), source]);
                }
                Ok(table.to_string())
            }
            other => Err(ApiError::InvalidArgument(format!(
                "Invalid format: {} (must be 'text' or 'json')",
                other
            ))),
        }
    }

    fn add(
        &mut self,
        folder: &str,
        name: &str,
        text: Option<&str>,
        file: Option<&PathBuf>,
    ) -> Result<String, ApiError> {
        let id = match (text, file) {
            (Some(text), _) => self.vfs.add_file_as_text(folder, name, text)?,
            (None, Some(path)) => {
                let bytes = std::fs::read(path).map_err(|e| {
                    ApiError::InvalidArgument(format!("Failed to read {}: {}", path.display(), e))
                })?;
                if name.ends_with(".json") {
                    let text = String::from_utf8(bytes).map_err(|_| {
                        ApiError::InvalidArgument(format!("{} is not UTF-8 text", path.display()))
                    })?;
                    self.vfs.add_file_as_text(folder, name, &text)?
                } else {
                    self.vfs.add_file(folder, FileRecord::from_bytes(name, &bytes))?
                }
            }
            (None, None) => {
                return Err(ApiError::InvalidArgument(
                    "Either --text or --file is required".to_string(),
                ))
            }
        };
        Ok(format!("Added {} {} to {}", id, name, folder))
    }

    fn render_tree(&self) -> String {
        let mut out = String::new();
        for root in self.vfs.list_root_folders() {
            self.render_folder(*root, 0, &mut out);
        }
        out
    }

    fn render_folder(&self, id: FolderId, depth: usize, out: &mut String) {
        let Some(folder) = self.vfs.folder(id) else {
            return;
        };
        let _ = writeln!(
            out,
            "{}{}/ ({} files)",
            "  ".repeat(depth),
            folder.name,
            folder.files.len()
        );
        for child in self.vfs.list_children(id) {
            self.render_folder(*child, depth + 1, out);
        }
    }

    fn render_report(&self) -> String {
        let report = self.vfs.last_reload_report();
        let mut out = format!(
            "loaded: {}\nnext id: {}\n",
            report.loaded,
            self.vfs.next_file_id().0
        );
        if report.is_clean() {
            out.push_str("no problems found\n");
            return out;
        }
        for (id, path) in &report.recreated {
            let _ = writeln!(out, "recreated folder {:?} for {}", path, id);
        }
        for (id, path) in &report.relocated {
            let _ = writeln!(out, "relocated {} (stored folder {:?})", id, path);
        }
        for id in &report.corrupt {
            let _ = writeln!(out, "corrupt record {}", id);
        }
        for id in &report.orphaned {
            let _ = writeln!(out, "orphaned record {} above the id counter", id);
        }
        out
    }
}

fn render_content(record: &FileRecord) -> Result<String, ApiError> {
    if let FileOrigin::BuiltIn { locator } = record.origin() {
        return Ok(format!("built-in resource: {}", locator));
    }
    match record.file_data()? {
        FileData::Json(value) => serde_json::to_string_pretty(&value)
            .map_err(|e| ApiError::InvalidArgument(format!("Failed to render JSON: {}", e))),
        FileData::Binary(bytes) => Ok(format!(
            "{} bytes of {}",
            bytes.len(),
            record.mime_type()
        )),
    }
}
