//! Storage operations
//!
//! [`AssetStore`] handles list, retrieve, store and delete for the files of a
//! single category directory.

use std::fs;
use std::io;

use log::{debug, error, info, warn};

use crate::error::StorageError;
use crate::storage::category::{Category, CategoryDir};
use crate::storage::filesystem::{create_directory, file_exists, is_temp_artifact, write_atomic};
use crate::storage::results::StoredFile;
use crate::storage::validation::validate_name;

/// File operations bound to one resolved category directory.
#[derive(Debug, Clone)]
pub struct AssetStore {
    dir: CategoryDir,
}

impl AssetStore {
    pub fn open(dir: CategoryDir) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &CategoryDir {
        &self.dir
    }

    pub fn category(&self) -> &Category {
        self.dir.category()
    }

    /// Regular files directly inside the directory.
    ///
    /// A directory that does not exist lists as empty; subdirectories are
    /// never descended into.
    pub fn list(&self) -> Result<Vec<StoredFile>, StorageError> {
        let path = self.dir.path();
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                error!("Failed to list {}: {}", path.display(), e);
                return Err(StorageError::ReadFailed {
                    name: path.display().to_string(),
                    source: e,
                });
            }
        };

        let mut files = Vec::new();
        for entry in entries.flatten() {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if !file_type.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                warn!("Skipping non UTF-8 file name in {}", path.display());
                continue;
            };
            if is_temp_artifact(&name) {
                continue;
            }

            let size = entry.metadata().ok().map(|m| m.len());
            files.push(StoredFile { name, size });
        }

        debug!(
            "Listed category {} ({}) - {} files",
            self.category(),
            path.display(),
            files.len()
        );
        Ok(files)
    }

    /// Store `bytes` under `name`, replacing any existing file of that name.
    ///
    /// Returns the size read back from disk after the write.
    pub fn put(&self, name: &str, bytes: &[u8]) -> Result<u64, StorageError> {
        let name = validate_name(name)?;

        create_directory(self.dir.path()).map_err(|source| StorageError::CreateDirFailed {
            path: self.dir.path().display().to_string(),
            source,
        })?;

        let dest = self.dir.path().join(&name);
        match write_atomic(&dest, bytes) {
            Ok(size) => {
                info!(
                    "Stored {} in category {} ({} bytes)",
                    name,
                    self.category(),
                    size
                );
                Ok(size)
            }
            Err(source) => {
                error!("Failed to store {}: {}", dest.display(), source);
                Err(StorageError::WriteFailed { name, source })
            }
        }
    }

    /// Read the full content of `name`.
    pub fn get(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let name = validate_name(name)?;
        let path = self.dir.path().join(&name);

        if !file_exists(&path) {
            return Err(StorageError::NotFound(name));
        }

        fs::read(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                StorageError::NotFound(name)
            } else {
                error!("Failed to read {}: {}", path.display(), source);
                StorageError::ReadFailed { name, source }
            }
        })
    }

    /// Remove `name` from the directory. No retries.
    ///
    /// A name that exists but cannot be unlinked as a file (a subdirectory,
    /// say) is a [`StorageError::DeleteFailed`], not a miss.
    pub fn delete(&self, name: &str) -> Result<(), StorageError> {
        let name = validate_name(name)?;
        let path = self.dir.path().join(&name);

        match fs::remove_file(&path) {
            Ok(()) => {
                info!("Deleted {} from category {}", name, self.category());
                Ok(())
            }
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(name))
            }
            Err(source) => {
                error!("Failed to delete {}: {}", path.display(), source);
                Err(StorageError::DeleteFailed { name, source })
            }
        }
    }

    /// Whether `name` exists here as a regular file. In-flight upload temp
    /// files are never reported.
    pub fn contains(&self, name: &str) -> bool {
        match validate_name(name) {
            Ok(name) if !is_temp_artifact(&name) => file_exists(&self.dir.path().join(name)),
            _ => false,
        }
    }
}
