//! JSON file storage adapter
//!
//! Each storage key maps to one `<key>.json` file in the data directory.
//! Values are read whole and overwritten whole.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tidings_core::{CoreError, Result, Storage};

/// Directory-backed key-value storage
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a new storage adapter rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Get the storage directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that holds the value for `key`
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.contains("..") {
            return Err(CoreError::validation(
                "storage_key",
                format!("'{}' cannot be used as a file name", key),
            ));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CoreError::storage_with_source(
                format!("Failed to read {}", path.display()),
                e,
            )),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| {
            CoreError::storage_with_source(format!("Failed to create {}", self.dir.display()), e)
        })?;
        fs::write(&path, value).map_err(|e| {
            CoreError::storage_with_source(format!("Failed to write {}", path.display()), e)
        })
    }
}
