//! File system operations
//!
//! Thin wrappers over `std::fs` used by the asset store.

use std::fs::{self, File};
use std::io::{Result, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};

const TEMP_SUFFIX: &str = ".upload.tmp";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Create a directory and its parents; succeeds if it already exists.
pub fn create_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
}

/// Check if file exists
pub fn file_exists(path: &Path) -> bool {
    path.is_file()
}

/// Check if directory exists
pub fn directory_exists(path: &Path) -> bool {
    path.is_dir()
}

/// True for the temporary files [`write_atomic`] leaves behind mid-write.
pub fn is_temp_artifact(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(TEMP_SUFFIX)
}

/// Write `bytes` to `dest` through a temporary sibling and a rename, so a
/// concurrent reader sees either the old content or the new, never a prefix.
///
/// Returns the size of `dest` as reported by the filesystem afterwards.
pub fn write_atomic(dest: &Path, bytes: &[u8]) -> Result<u64> {
    let temp = temp_path_for(dest);

    let result = write_then_rename(&temp, dest, bytes);
    if result.is_err() {
        let _ = fs::remove_file(&temp);
    }
    result?;

    Ok(fs::metadata(dest)?.len())
}

fn write_then_rename(temp: &Path, dest: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(temp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);
    fs::rename(temp, dest)
}

fn temp_path_for(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    dest.with_file_name(format!(".{name}.{}-{seq}{TEMP_SUFFIX}", process::id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn create_directory_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("UI");
        create_directory(&dir).unwrap();
        create_directory(&dir).unwrap();
        assert!(directory_exists(&dir));
    }

    #[test]
    fn write_atomic_overwrites_and_reports_size() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("a.svg");

        assert_eq!(write_atomic(&dest, b"first version").unwrap(), 13);
        assert_eq!(write_atomic(&dest, b"v2").unwrap(), 2);
        assert_eq!(fs::read(&dest).unwrap(), b"v2");
    }

    #[test]
    fn write_atomic_leaves_no_temp_files() {
        let tmp = TempDir::new().unwrap();
        write_atomic(&tmp.path().join("a.png"), b"png").unwrap();

        let names: Vec<String> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.png".to_string()]);
    }

    #[test]
    fn write_atomic_fails_when_parent_is_missing() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("missing").join("a.svg");
        assert!(write_atomic(&dest, b"x").is_err());
        assert!(!file_exists(&dest));
    }

    #[test]
    fn temp_names_are_recognised() {
        let temp = temp_path_for(Path::new("/store/a.svg"));
        let name = temp.file_name().unwrap().to_str().unwrap();
        assert!(is_temp_artifact(name));
        assert!(!is_temp_artifact("a.svg"));
        assert!(!is_temp_artifact(".hidden.svg"));
    }
}
