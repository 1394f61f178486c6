//! Database directory management.
//!
//! This module handles the file system layout for JsonDB:
//!
//! ```text
//! <base_path>/
//! ├─ LOCK              # Advisory lock for single-owner access
//! ├─ users.json        # One file per collection
//! └─ settings.json
//! ```
//!
//! The LOCK file ensures only one `Database` owns the directory at a time.

use crate::error::{CoreError, CoreResult};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

/// Name of the advisory lock file.
pub const LOCK_FILE: &str = "LOCK";

/// Owns the base directory and, optionally, its lock.
///
/// # Example
///
/// ```rust,ignore
/// use jsondb_core::dir::DatabaseDir;
/// use std::path::Path;
///
/// let dir = DatabaseDir::open(Path::new("db"), true, true)?;
/// println!("collections live in {:?}", dir.path());
/// ```
#[derive(Debug)]
pub struct DatabaseDir {
    /// Root directory path.
    path: PathBuf,
    /// Lock file handle (held for exclusive access). The lock is released
    /// when the handle is closed.
    lock_file: Option<File>,
}

impl DatabaseDir {
    /// Opens or creates a base directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the base directory
    /// * `create_if_missing` - If true, creates the directory if it doesn't exist
    /// * `lock` - If true, takes an exclusive advisory lock on `LOCK`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory doesn't exist and `create_if_missing` is false
    /// - The path exists but is not a directory
    /// - Another handle holds the lock (returns `DatabaseLocked`)
    /// - I/O errors occur
    pub fn open(path: &Path, create_if_missing: bool, lock: bool) -> CoreResult<Self> {
        if !path.exists() {
            if create_if_missing {
                fs::create_dir_all(path)?;
            } else {
                return Err(CoreError::invalid_directory(path, "directory does not exist"));
            }
        }

        if !path.is_dir() {
            return Err(CoreError::invalid_directory(path, "path is not a directory"));
        }

        let lock_file = if lock {
            let lock_file = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(false)
                .open(path.join(LOCK_FILE))?;

            if lock_file.try_lock_exclusive().is_err() {
                return Err(CoreError::DatabaseLocked);
            }
            Some(lock_file)
        } else {
            None
        };

        Ok(Self {
            path: path.to_path_buf(),
            lock_file,
        })
    }

    /// Returns the path to the base directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if this handle holds the directory lock.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.lock_file.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_creates_directory() {
        let temp = tempdir().unwrap();
        let db_path = temp.path().join("new_db");

        assert!(!db_path.exists());

        let dir = DatabaseDir::open(&db_path, true, true).unwrap();
        assert!(db_path.is_dir());
        assert!(db_path.join(LOCK_FILE).exists());
        assert!(dir.is_locked());
    }

    #[test]
    fn open_fails_if_not_exists_and_no_create() {
        let temp = tempdir().unwrap();
        let db_path = temp.path().join("nonexistent");

        let result = DatabaseDir::open(&db_path, false, true);
        assert!(matches!(result, Err(CoreError::InvalidDirectory { .. })));
    }

    #[test]
    fn open_fails_on_regular_file() {
        let temp = tempdir().unwrap();
        let file_path = temp.path().join("file");
        fs::write(&file_path, b"x").unwrap();

        let result = DatabaseDir::open(&file_path, true, false);
        assert!(matches!(result, Err(CoreError::InvalidDirectory { .. })));
    }

    #[test]
    fn lock_prevents_second_open() {
        let temp = tempdir().unwrap();
        let db_path = temp.path().join("locked_db");

        let _dir1 = DatabaseDir::open(&db_path, true, true).unwrap();

        let result = DatabaseDir::open(&db_path, true, true);
        assert!(matches!(result, Err(CoreError::DatabaseLocked)));
    }

    #[test]
    fn lock_released_on_drop() {
        let temp = tempdir().unwrap();
        let db_path = temp.path().join("reopen_db");

        {
            let _dir = DatabaseDir::open(&db_path, true, true).unwrap();
        }

        let _dir2 = DatabaseDir::open(&db_path, true, true).unwrap();
    }

    #[test]
    fn unlocked_handles_coexist() {
        let temp = tempdir().unwrap();

        let a = DatabaseDir::open(temp.path(), true, false).unwrap();
        let b = DatabaseDir::open(temp.path(), true, false).unwrap();
        assert!(!a.is_locked());
        assert_eq!(a.path(), b.path());
        assert!(!temp.path().join(LOCK_FILE).exists());
    }
}
