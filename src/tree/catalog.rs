//! Built-in catalog
//!
//! Static description of the read-only content shipped with the application.
//! A catalog is a flat list of `(folder path, file name, resource locator)`
//! entries that expands into a fresh [`NamespaceTree`] on every reload.

use super::node::FileRecord;
use super::NamespaceTree;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Factory for the structural built-in tree
pub trait BuiltInCatalog: Send + Sync {
    fn build(&self) -> NamespaceTree;
}

/// One built-in file and the folder it lives in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub folder: String,
    pub name: String,
    pub locator: String,
}

/// Catalog of built-in files, optionally loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Folders to create even when they hold no built-in file
    #[serde(default)]
    pub folders: Vec<String>,
    #[serde(default)]
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add an entry, builder style
    pub fn with_file(mut self, folder: &str, name: &str, locator: &str) -> Self {
        self.entries.push(CatalogEntry {
            folder: folder.to_string(),
            name: name.to_string(),
            locator: locator.to_string(),
        });
        self
    }

    pub fn with_folder(mut self, folder: &str) -> Self {
        self.folders.push(folder.to_string());
        self
    }

    /// The palettes, photos and overlay images bundled with the color picker
    pub fn default_palette() -> Self {
        Catalog::empty()
            .with_file("Named Colors/Modern", "Web Colors", "data/web-colors.json")
            .with_file("Named Colors/Modern", "Pantone&reg;", "data/pantone-colors.json")
            .with_file(
                "Named Colors/Classic Desktop Computers",
                "Windows 3.x and OS/2",
                "data/win16-colors.json",
            )
            .with_file(
                "Named Colors/Classic Desktop Computers",
                "Windows 95/98/Me",
                "data/win95-colors.json",
            )
            .with_file(
                "Named Colors/Classic Desktop Computers",
                "Macintosh",
                "data/mac-colors.json",
            )
            .with_file(
                "Named Colors/Classic Desktop Computers",
                "Tandy 1000 and PCjr",
                "data/tandy-colors.json",
            )
            .with_file(
                "Named Colors/Classic Desktop Computers",
                "Acorn Risc-OS",
                "data/risc-colors.json",
            )
            .with_file(
                "Custom Palettes/Classic Desktop Computers",
                "Photoshop&reg; 3.0",
                "images/ps3-palette.png",
            )
            .with_file(
                "Custom Palettes/Classic Desktop Computers",
                "VGA 256 Color",
                "images/palette-vga256.png",
            )
            .with_file(
                "Custom Palettes/Classic Desktop Computers",
                "Windows 16 Color",
                "images/palette-win16.png",
            )
            .with_file(
                "Custom Palettes/Video Game Consoles",
                "Atari 2600",
                "images/palette-atari2600.png",
            )
            .with_file(
                "Custom Palettes/Video Game Consoles",
                "Nintendo",
                "images/palette-nes.png",
            )
            .with_file(
                "Custom Palettes/Video Game Consoles",
                "Sega Master System",
                "images/palette-segasms.png",
            )
            .with_file("Photos/Built In", "Green Hill", "images/image-hill2.avif")
            .with_file("Photos/Built In", "Parrots", "images/image-parrots2.avif")
            .with_file("Overlay Images/Built In", "Logo", "images/color-picker-logo.png")
    }

    /// Load a catalog from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ApiError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ApiError::ConfigError(format!(
                "Failed to read catalog {}: {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            ApiError::ConfigError(format!(
                "Failed to parse catalog {}: {}",
                path.display(),
                e
            ))
        })
    }
}

impl BuiltInCatalog for Catalog {
    fn build(&self) -> NamespaceTree {
        let mut tree = NamespaceTree::new();
        for folder in &self.folders {
            if tree.resolve(folder, None, true).is_none() {
                tracing::warn!("Skipping catalog folder with invalid path {:?}", folder);
            }
        }
        for entry in &self.entries {
            let Some(folder) = tree.resolve(&entry.folder, None, true) else {
                tracing::warn!(
                    "Skipping catalog entry {:?}: invalid folder path {:?}",
                    entry.name,
                    entry.folder
                );
                continue;
            };
            let mut file = FileRecord::built_in(entry.name.clone(), entry.locator.clone());
            file.folder_path = entry.folder.clone();
            tree.attach_file(folder, file);
        }
        tree.relink_parents();
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette_shape() {
        let tree = Catalog::default_palette().build();
        let roots: Vec<&str> = tree
            .roots()
            .iter()
            .map(|id| tree.folder(*id).unwrap().name.as_str())
            .collect();
        assert_eq!(
            roots,
            vec!["Named Colors", "Custom Palettes", "Photos", "Overlay Images"]
        );

        let classic = tree
            .find("Custom Palettes/Classic Desktop Computers", None)
            .unwrap();
        assert_eq!(tree.file_count(classic, false), 3);
        let named = tree.find("Named Colors", None).unwrap();
        assert_eq!(tree.file_count(named, false), 0);
        assert_eq!(tree.file_count(named, true), 7);

        // same subfolder name under two different roots stays distinct
        let other = tree
            .find("Named Colors/Classic Desktop Computers", None)
            .unwrap();
        assert_ne!(classic, other);
    }

    #[test]
    fn test_built_in_files_are_not_user_files() {
        let tree = Catalog::default_palette().build();
        for id in tree.flatten() {
            for file in tree.files(id) {
                assert!(!file.is_user_file());
                assert!(!file.loaded);
                assert!(file.resource_locator.is_some());
            }
        }
    }

    #[test]
    fn test_invalid_entries_are_skipped() {
        let catalog = Catalog::empty()
            .with_file("", "ghost", "nowhere.json")
            .with_file("Good", "kept", "kept.json")
            .with_folder("Empty/Nested");
        let tree = catalog.build();
        assert_eq!(tree.roots().len(), 2);
        let good = tree.find("Good", None).unwrap();
        assert_eq!(tree.files(good).len(), 1);
        assert!(tree.find("Empty/Nested", None).is_some());
    }

    #[test]
    fn test_catalog_from_toml() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("catalog.toml");
        std::fs::write(
            &path,
            r#"
folders = ["Photos"]

[[entries]]
folder = "Named Colors/Modern"
name = "Web Colors"
locator = "data/web-colors.json"
"#,
        )
        .unwrap();
        let catalog = Catalog::load_from_file(&path).unwrap();
        assert_eq!(catalog.folders, vec!["Photos".to_string()]);
        assert_eq!(catalog.entries.len(), 1);
        assert_eq!(catalog.entries[0].locator, "data/web-colors.json");
    }
}
