//! Category resolution
//!
//! Maps category identifiers to directories under the store root and
//! enumerates the categories that currently exist on disk.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::StorageError;
use crate::storage::filesystem::{create_directory, directory_exists};
use crate::storage::validation::sanitize_segment;

/// Reserved name of the category living directly in the store root.
pub const DEFAULT_CATEGORY: &str = "default";

/// A storage partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// The store root itself.
    Default,
    /// An immediate subdirectory of the root. Always a sanitized segment.
    Named(String),
}

impl Category {
    /// Parse an untrusted category parameter.
    ///
    /// Absent, empty and `"default"` all select [`Category::Default`]. Any
    /// other value is reduced to its final path segment. A value that only
    /// becomes `default` after sanitizing (`x/default`) is rejected, since no
    /// subdirectory may take the root's name.
    pub fn parse(raw: Option<&str>) -> Result<Self, StorageError> {
        let raw = match raw {
            None => return Ok(Category::Default),
            Some(raw) if raw.is_empty() || raw == DEFAULT_CATEGORY => {
                return Ok(Category::Default);
            }
            Some(raw) => raw,
        };

        let segment = sanitize_segment(raw);
        if segment.is_empty() {
            warn!("Rejected category {raw:?}: nothing left after sanitizing");
            return Err(StorageError::InvalidName(raw.to_string()));
        }
        if segment == DEFAULT_CATEGORY {
            warn!("Rejected category {raw:?}: reserved name {DEFAULT_CATEGORY}");
            return Err(StorageError::InvalidName(raw.to_string()));
        }
        Ok(Category::Named(segment))
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Category::Default)
    }

    /// Name as reported to clients; `"default"` for the root.
    pub fn as_str(&self) -> &str {
        match self {
            Category::Default => DEFAULT_CATEGORY,
            Category::Named(name) => name,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved category directory. Only [`CategoryResolver`] creates these,
/// so `path` is always the root or one sanitized segment below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDir {
    category: Category,
    path: PathBuf,
}

impl CategoryDir {
    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Turns category identifiers into directory handles under a fixed root.
#[derive(Debug, Clone)]
pub struct CategoryResolver {
    root: PathBuf,
}

impl CategoryResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an untrusted category parameter. Touches no filesystem state.
    pub fn resolve(&self, raw: Option<&str>) -> Result<CategoryDir, StorageError> {
        Category::parse(raw).map(|category| self.dir_for(category))
    }

    /// Directory handle for an already-parsed category.
    pub fn dir_for(&self, category: Category) -> CategoryDir {
        let path = match &category {
            Category::Default => self.root.clone(),
            Category::Named(name) => self.root.join(name),
        };
        CategoryDir { category, path }
    }

    /// Create the directory if it is absent. Safe to race with other callers.
    pub fn ensure_exists(&self, dir: &CategoryDir) -> Result<(), StorageError> {
        if directory_exists(&dir.path) {
            return Ok(());
        }
        create_directory(&dir.path).map_err(|source| StorageError::CreateDirFailed {
            path: dir.path.display().to_string(),
            source,
        })?;
        info!("Created directory for category {}", dir.category);
        Ok(())
    }

    /// Create the store root if it is absent.
    pub fn ensure_root(&self) -> Result<(), StorageError> {
        self.ensure_exists(&self.dir_for(Category::Default))
    }
}

/// Enumerates the categories present under the store root.
#[derive(Debug, Clone)]
pub struct CategoryIndex {
    root: PathBuf,
}

impl CategoryIndex {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Immediate subdirectories of the root, in directory-read order.
    ///
    /// Files at the root are default-category assets and are skipped, as are
    /// non UTF-8 names and a directory named `default`, which no category
    /// parameter can address. A missing or unreadable root yields an empty
    /// list.
    pub fn list_categories(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("No categories under {}: {}", self.root.display(), e);
                return Vec::new();
            }
        };

        entries
            .flatten()
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name != DEFAULT_CATEGORY && sanitize_segment(name) == *name)
            .collect()
    }
}
