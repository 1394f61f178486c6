//! Database configuration.

use jsondb_codec::Encoding;

/// Default file extension for collection files.
pub const DEFAULT_EXTENSION: &str = "json";

/// Configuration for opening a database.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether to create the base directory if it doesn't exist.
    pub create_if_missing: bool,

    /// Extension of collection files, without the dot.
    pub extension: String,

    /// Whether collection files are pretty-printed.
    pub pretty: bool,

    /// Whether every save is fsynced before returning (safer but slower).
    pub sync_on_write: bool,

    /// Whether to hold an exclusive advisory lock on the base directory.
    pub lock_directory: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            extension: DEFAULT_EXTENSION.to_string(),
            pretty: true,
            sync_on_write: false,
            lock_directory: true,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create the base directory if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets the collection file extension.
    #[must_use]
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Sets whether collection files are pretty-printed.
    #[must_use]
    pub const fn pretty(mut self, value: bool) -> Self {
        self.pretty = value;
        self
    }

    /// Sets whether to fsync on every save.
    #[must_use]
    pub const fn sync_on_write(mut self, value: bool) -> Self {
        self.sync_on_write = value;
        self
    }

    /// Sets whether to lock the base directory.
    #[must_use]
    pub const fn lock_directory(mut self, value: bool) -> Self {
        self.lock_directory = value;
        self
    }

    /// Text layout used when saving.
    #[must_use]
    pub const fn encoding(&self) -> Encoding {
        if self.pretty {
            Encoding::Pretty
        } else {
            Encoding::Compact
        }
    }
}
