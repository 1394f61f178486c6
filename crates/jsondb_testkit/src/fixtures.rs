//! Test fixtures and database helpers.
//!
//! Provides convenience functions for setting up test databases
//! and common test scenarios.

use jsondb_core::{Config, Database};
use std::path::Path;
use tempfile::TempDir;

/// A test database in a temporary directory, removed on drop.
pub struct TestDatabase {
    /// The database instance.
    pub db: Database,
    /// The temporary directory (kept alive to prevent cleanup).
    temp_dir: TempDir,
}

impl TestDatabase {
    /// Creates a database with the default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a database with a custom configuration.
    pub fn with_config(config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db = Database::open_with_config(temp_dir.path(), config)
            .expect("Failed to open test database");
        Self { db, temp_dir }
    }

    /// Returns the base directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Returns the raw file content of a collection.
    pub fn read_file(&self, name: &str) -> String {
        let file = self
            .path()
            .join(format!("{name}.{}", self.db.config().extension));
        std::fs::read_to_string(file).expect("Failed to read collection file")
    }

    /// Overwrites the raw file content of a collection.
    pub fn write_file(&self, name: &str, content: &[u8]) {
        let file = self
            .path()
            .join(format!("{name}.{}", self.db.config().extension));
        std::fs::write(file, content).expect("Failed to write collection file");
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestDatabase {
    type Target = Database;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

/// Runs a test with a temporary database.
///
/// # Example
///
/// ```rust,ignore
/// use jsondb_testkit::with_temp_db;
///
/// #[test]
/// fn my_test() {
///     with_temp_db(|db| {
///         let users = db.collection("users").unwrap();
///         // ... test operations
///     });
/// }
/// ```
pub fn with_temp_db<F, R>(f: F) -> R
where
    F: FnOnce(&Database) -> R,
{
    let test_db = TestDatabase::new();
    f(&test_db.db)
}

/// Runs a test with a temporary database and its base directory.
pub fn with_file_db<F, R>(f: F) -> R
where
    F: FnOnce(&Database, &Path) -> R,
{
    let test_db = TestDatabase::new();
    f(&test_db.db, test_db.path())
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;
    use serde_json::json;

    /// Creates a database whose `mons` collection holds the starter
    /// Pokémon with ids 1 to 3.
    pub fn mons_database() -> TestDatabase {
        let test_db = TestDatabase::new();
        let mons = test_db.collection("mons").expect("Failed to open collection");
        mons.bulk_insert(vec![
            json!({"name": "Bulbasaur", "type": ["grass", "poison"], "level": 5}),
            json!({"name": "Charmander", "type": ["fire"], "level": 5}),
            json!({"name": "Squirtle", "type": ["water"], "level": 5}),
        ])
        .expect("Failed to insert records");
        test_db
    }

    /// Creates a database with `record_count` records in `test`.
    pub fn populated_database(record_count: usize) -> TestDatabase {
        let test_db = TestDatabase::new();
        let records = (0..record_count).map(|i| json!({"index": i})).collect();
        test_db
            .collection("test")
            .expect("Failed to open collection")
            .bulk_insert(records)
            .expect("Failed to insert records");
        test_db
    }

    /// Creates a database with several collections holding one record each.
    pub fn multi_collection_database(collection_count: usize) -> (TestDatabase, Vec<String>) {
        let test_db = TestDatabase::new();
        let mut names = Vec::with_capacity(collection_count);

        for i in 0..collection_count {
            let name = format!("collection_{i}");
            test_db
                .collection(&name)
                .expect("Failed to open collection")
                .insert(json!({"collection": i}))
                .expect("Failed to insert record");
            names.push(name);
        }

        (test_db, names)
    }
}
