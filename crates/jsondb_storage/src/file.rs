//! Directory of whole-file documents.

use crate::error::{StorageError, StorageResult};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::trace;

/// Suffix appended to a file name while its replacement is being written.
const TEMP_SUFFIX: &str = "tmp";

/// Checks that `name` can be used as a single file stem.
///
/// # Errors
///
/// Returns [`StorageError::InvalidName`] for empty names, `.` and `..`, and
/// names containing path separators or NUL bytes.
pub fn validate_name(name: &str) -> StorageResult<()> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name == "." || name == ".." {
        Some("name refers to a directory")
    } else if name.contains(['/', '\\']) {
        Some("name contains a path separator")
    } else if name.contains('\0') {
        Some("name contains a NUL byte")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(StorageError::InvalidName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// A directory where each name is backed by one file.
///
/// # Durability
///
/// - `write` replaces the file via write-to-temp and rename
/// - with `sync_on_write`, the temporary file and (on Unix) the directory
///   are fsynced before returning
///
/// # Thread Safety
///
/// `FileStore` holds no open handles and is freely shareable. Concurrent
/// writers to the *same* name must be serialized by the caller, since they
/// share a temporary file.
///
/// # Example
///
/// ```no_run
/// use jsondb_storage::FileStore;
///
/// let store = FileStore::new("db", "json").sync_on_write(true);
/// store.write("settings", br#"{"theme": "dark"}"#).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    extension: String,
    sync_on_write: bool,
}

impl FileStore {
    /// Creates a store rooted at `dir` using files named `<name>.<extension>`.
    ///
    /// The directory is not created.
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
            sync_on_write: false,
        }
    }

    /// Sets whether writes are fsynced before returning.
    #[must_use]
    pub fn sync_on_write(mut self, value: bool) -> Self {
        self.sync_on_write = value;
        self
    }

    /// File path backing `name`.
    fn path_for(&self, name: &str) -> StorageResult<PathBuf> {
        validate_name(name)?;
        Ok(self.dir.join(format!("{name}.{}", self.extension)))
    }

    fn temp_path(path: &Path) -> PathBuf {
        let mut os = path.as_os_str().to_owned();
        os.push(".");
        os.push(TEMP_SUFFIX);
        PathBuf::from(os)
    }

    fn stem_of(&self, path: &Path) -> Option<String> {
        if path.extension()?.to_str()? != self.extension {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        validate_name(stem).ok()?;
        Some(stem.to_string())
    }

    // ------------------------------------------------------------------
    // Blocking
    // ------------------------------------------------------------------

    /// Reads the whole file for `name`, creating it with `initial` if missing.
    ///
    /// Creation uses `create_new`, so a racing creator is tolerated.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or an I/O error occurs.
    pub fn read_or_init(&self, name: &str, initial: &[u8]) -> StorageResult<Vec<u8>> {
        let path = self.path_for(name)?;

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                trace!(path = %path.display(), "creating file");
                file.write_all(initial)?;
                if self.sync_on_write {
                    file.sync_all()?;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e.into()),
        }

        let data = fs::read(&path)?;
        trace!(path = %path.display(), len = data.len(), "read file");
        Ok(data)
    }

    /// Replaces the file for `name` with `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or an I/O error occurs.
    pub fn write(&self, name: &str, data: &[u8]) -> StorageResult<()> {
        let path = self.path_for(name)?;
        let temp = Self::temp_path(&path);

        let mut file = File::create(&temp)?;
        file.write_all(data)?;
        if self.sync_on_write {
            file.sync_all()?;
        }
        drop(file);

        fs::rename(&temp, &path)?;
        if self.sync_on_write {
            self.sync_directory()?;
        }

        trace!(path = %path.display(), len = data.len(), "wrote file");
        Ok(())
    }

    /// Removes the file for `name`.
    ///
    /// Returns `false` if there was no file.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or removal fails for any
    /// reason other than the file being missing.
    pub fn remove(&self, name: &str) -> StorageResult<bool> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                trace!(path = %path.display(), "removed file");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Lists the names of all files with this store's extension, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn list(&self) -> StorageResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = self.stem_of(&entry.path()) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    #[cfg(unix)]
    fn sync_directory(&self) -> StorageResult<()> {
        File::open(&self.dir)?.sync_all()?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_directory(&self) -> StorageResult<()> {
        Ok(())
    }

    // ------------------------------------------------------------------
    // Non-blocking
    // ------------------------------------------------------------------

    /// Async form of [`FileStore::read_or_init`].
    ///
    /// # Errors
    ///
    /// Same as [`FileStore::read_or_init`].
    pub async fn read_or_init_async(&self, name: &str, initial: &[u8]) -> StorageResult<Vec<u8>> {
        let path = self.path_for(name)?;

        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(mut file) => {
                trace!(path = %path.display(), "creating file");
                file.write_all(initial).await?;
                file.flush().await?;
                if self.sync_on_write {
                    file.sync_all().await?;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e.into()),
        }

        let data = tokio::fs::read(&path).await?;
        trace!(path = %path.display(), len = data.len(), "read file");
        Ok(data)
    }

    /// Async form of [`FileStore::write`].
    ///
    /// # Errors
    ///
    /// Same as [`FileStore::write`].
    pub async fn write_async(&self, name: &str, data: &[u8]) -> StorageResult<()> {
        let path = self.path_for(name)?;
        let temp = Self::temp_path(&path);

        let mut file = tokio::fs::File::create(&temp).await?;
        file.write_all(data).await?;
        file.flush().await?;
        if self.sync_on_write {
            file.sync_all().await?;
        }
        drop(file);

        tokio::fs::rename(&temp, &path).await?;
        if self.sync_on_write && cfg!(unix) {
            tokio::fs::File::open(&self.dir).await?.sync_all().await?;
        }

        trace!(path = %path.display(), len = data.len(), "wrote file");
        Ok(())
    }

    /// Async form of [`FileStore::remove`].
    ///
    /// # Errors
    ///
    /// Same as [`FileStore::remove`].
    pub async fn remove_async(&self, name: &str) -> StorageResult<bool> {
        let path = self.path_for(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                trace!(path = %path.display(), "removed file");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Async form of [`FileStore::list`].
    ///
    /// # Errors
    ///
    /// Same as [`FileStore::list`].
    pub async fn list_async(&self) -> StorageResult<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = self.stem_of(&entry.path()) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn init_creates_file_with_initial_bytes() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path(), "json");

        let data = store.read_or_init("users", b"null").unwrap();
        assert_eq!(data, b"null");
        assert!(dir.path().join("users.json").is_file());
    }

    #[test]
    fn init_keeps_existing_content() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("users.json"), b"[1]").unwrap();
        let store = FileStore::new(dir.path(), "json");

        assert_eq!(store.read_or_init("users", b"null").unwrap(), b"[1]");
    }

    #[test]
    fn write_replaces_whole_file() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path(), "json");

        store.write("users", b"a much longer first version").unwrap();
        store.write("users", b"short").unwrap();

        assert_eq!(store.read_or_init("users", b"null").unwrap(), b"short");
        assert!(!dir.path().join("users.json.tmp").exists());
    }

    #[test]
    fn write_with_sync() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path(), "json").sync_on_write(true);

        store.write("users", b"[]").unwrap();
        assert_eq!(fs::read(dir.path().join("users.json")).unwrap(), b"[]");
    }

    #[test]
    fn remove_reports_presence() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path(), "json");

        assert!(!store.remove("users").unwrap());
        store.write("users", b"[]").unwrap();
        assert!(dir.path().join("users.json").is_file());
        assert!(store.remove("users").unwrap());
        assert!(!dir.path().join("users.json").exists());
    }

    #[test]
    fn list_filters_by_extension() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path(), "json");

        store.write("b", b"null").unwrap();
        store.write("a", b"null").unwrap();
        fs::write(dir.path().join("LOCK"), b"").unwrap();
        fs::write(dir.path().join("c.json.tmp"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        fs::create_dir(dir.path().join("nested.json")).unwrap();

        assert_eq!(store.list().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn invalid_names_are_rejected() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path(), "json");

        for name in ["", ".", "..", "a/b", "a\\b", "nul\0"] {
            assert!(
                matches!(store.write(name, b"[]"), Err(StorageError::InvalidName { .. })),
                "{name:?} should be rejected"
            );
        }
        assert!(validate_name("pokémon teams").is_ok());
    }

    #[test]
    fn read_in_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("missing"), "json");

        let err = store.read_or_init("users", b"null").unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }

    #[tokio::test]
    async fn async_matches_blocking() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path(), "json");

        assert_eq!(store.read_or_init_async("users", b"null").await.unwrap(), b"null");
        store.write_async("users", b"[{\"id\":1}]").await.unwrap();
        assert_eq!(store.read_or_init("users", b"null").unwrap(), b"[{\"id\":1}]");

        store.write("other", b"{}").unwrap();
        assert_eq!(store.list_async().await.unwrap(), vec!["other", "users"]);

        assert!(store.remove_async("users").await.unwrap());
        assert!(!store.remove_async("users").await.unwrap());
    }

    #[tokio::test]
    async fn async_write_with_sync() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path(), "json").sync_on_write(true);

        store.write_async("users", b"[]").await.unwrap();
        assert_eq!(store.read_or_init_async("users", b"null").await.unwrap(), b"[]");
    }
}
