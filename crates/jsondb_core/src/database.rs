//! Database facade.

use crate::collection::{AsyncCollection, Collection, CollectionCore, GateRegistry};
use crate::config::Config;
use crate::dir::DatabaseDir;
use crate::error::{CoreError, CoreResult};
use jsondb_storage::{validate_name, FileStore, StorageError};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of [`Database::delete_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteAllReport {
    /// Number of collection files removed.
    pub removed: usize,
    /// Collections whose file could not be removed.
    pub failed: Vec<String>,
}

impl DeleteAllReport {
    /// Returns `true` if every file was removed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The main database handle.
///
/// A `Database` owns a base directory in which every collection is one
/// JSON file, `<base>/<name>.json`. There is no registry of collections:
/// any valid name can be resolved, and its file is created on first use.
///
/// # Opening a Database
///
/// ```rust,ignore
/// use jsondb_core::Database;
/// use serde_json::json;
/// use std::path::Path;
///
/// let db = Database::open(Path::new("my_database"))?;
///
/// let users = db.collection("users")?;
/// users.insert(json!({"name": "ash"}))?;
///
/// let settings = db.async_collection("settings")?;
/// settings.set_in("ui.theme", json!("dark")).await?;
/// ```
///
/// # Concurrency
///
/// Handles for the same name, blocking or async, share one mutation gate,
/// so concurrent writes to a collection never lose updates. Writes to
/// different collections proceed independently.
pub struct Database {
    /// Configuration.
    config: Config,
    /// Base directory (holds the lock).
    dir: DatabaseDir,
    /// Collection files.
    store: Arc<FileStore>,
    /// One mutation gate per collection name.
    gates: GateRegistry,
}

impl Database {
    /// Opens a database rooted at `path` with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Another handle has the directory locked (`DatabaseLocked`)
    /// - The path is not a usable directory (`InvalidDirectory`)
    /// - I/O errors occur
    pub fn open(path: &Path) -> CoreResult<Self> {
        Self::open_with_config(path, Config::default())
    }

    /// Opens a database rooted at `path` with custom configuration.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use jsondb_core::{Config, Database};
    /// use std::path::Path;
    ///
    /// let config = Config::default()
    ///     .pretty(false)
    ///     .sync_on_write(true);
    ///
    /// let db = Database::open_with_config(Path::new("my_database"), config)?;
    /// ```
    pub fn open_with_config(path: &Path, config: Config) -> CoreResult<Self> {
        let dir = DatabaseDir::open(path, config.create_if_missing, config.lock_directory)?;
        let store = FileStore::new(dir.path(), config.extension.clone())
            .sync_on_write(config.sync_on_write);

        debug!(path = %dir.path().display(), locked = dir.is_locked(), "opened database");

        Ok(Self {
            config,
            dir,
            store: Arc::new(store),
            gates: GateRegistry::default(),
        })
    }

    /// Returns the base directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Returns the configuration the database was opened with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn resolve(&self, name: &str) -> CoreResult<Arc<CollectionCore>> {
        validate_name(name).map_err(|e| match e {
            StorageError::InvalidName { name, reason } => {
                CoreError::InvalidCollectionName { name, reason }
            }
            other => other.into(),
        })?;

        debug!(collection = name, "resolved collection");
        Ok(Arc::new(CollectionCore::new(
            name.to_string(),
            Arc::clone(&self.store),
            self.gates.gate(name),
            self.config.encoding(),
        )))
    }

    /// Returns a blocking handle to the collection `name`.
    ///
    /// Nothing is read or written until the first operation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCollectionName` if `name` cannot be a file stem.
    pub fn collection(&self, name: &str) -> CoreResult<Collection> {
        self.resolve(name).map(Collection::new)
    }

    /// Returns an async handle to the collection `name`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCollectionName` if `name` cannot be a file stem.
    pub fn async_collection(&self, name: &str) -> CoreResult<AsyncCollection> {
        self.resolve(name).map(AsyncCollection::new)
    }

    /// Names of all collections that have a file on disk, sorted.
    pub fn collection_names(&self) -> CoreResult<Vec<String>> {
        Ok(self.store.list()?)
    }

    /// Async form of [`Database::collection_names`].
    pub async fn collection_names_async(&self) -> CoreResult<Vec<String>> {
        Ok(self.store.list_async().await?)
    }

    /// Removes every collection file.
    ///
    /// Failures on individual files are logged and reported rather than
    /// aborting the sweep.
    ///
    /// # Errors
    ///
    /// Only fails if the directory itself cannot be listed.
    pub fn delete_all(&self) -> CoreResult<DeleteAllReport> {
        let names = self.collection_names()?;
        Ok(sweep(names, |name| self.collection(name)?.delete()))
    }

    /// Async form of [`Database::delete_all`].
    pub async fn delete_all_async(&self) -> CoreResult<DeleteAllReport> {
        let mut report = DeleteAllReport::default();
        for name in self.collection_names_async().await? {
            let result = match self.async_collection(&name) {
                Ok(collection) => collection.delete().await,
                Err(e) => Err(e),
            };
            record(&mut report, name, result);
        }
        debug!(removed = report.removed, failed = report.failed.len(), "deleted all collections");
        Ok(report)
    }
}

/// Deletes each named collection with `delete`, carrying on past failures.
fn sweep(
    names: Vec<String>,
    mut delete: impl FnMut(&str) -> CoreResult<bool>,
) -> DeleteAllReport {
    let mut report = DeleteAllReport::default();
    for name in names {
        let result = delete(&name);
        record(&mut report, name, result);
    }
    debug!(removed = report.removed, failed = report.failed.len(), "deleted all collections");
    report
}

fn record(report: &mut DeleteAllReport, name: String, result: CoreResult<bool>) {
    match result {
        Ok(true) => report.removed += 1,
        Ok(false) => {}
        Err(error) => {
            warn!(collection = %name, %error, "failed to delete collection");
            report.failed.push(name);
        }
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.dir.path())
            .field("collections", &self.gates.len())
            .finish_non_exhaustive()
    }
}
