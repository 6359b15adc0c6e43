//! Storage location and schema version settings.

use super::migrations::DATABASE_VERSION;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default database file name.
pub const DATABASE_NAME: &str = "Pets.db";

/// Where the pets database lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "path")]
pub enum StoreLocation {
    /// On-disk database file. Created on first open.
    File(PathBuf),
    /// Private in-memory database, discarded with the connection.
    InMemory,
}

/// Settings consumed by [`crate::db::open_db`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub location: StoreLocation,
    /// Schema version the opened database is brought to.
    ///
    /// Raising this value wipes all stored pets on the next open.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
}

impl StoreConfig {
    /// Database file at an explicit path.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: StoreLocation::File(path.into()),
            schema_version: DATABASE_VERSION,
        }
    }

    /// `Pets.db` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::file(dir.as_ref().join(DATABASE_NAME))
    }

    pub fn in_memory() -> Self {
        Self {
            location: StoreLocation::InMemory,
            schema_version: DATABASE_VERSION,
        }
    }

    pub fn with_schema_version(mut self, version: u32) -> Self {
        self.schema_version = version;
        self
    }

    /// Short label used in `db_open` log events.
    pub(crate) fn mode(&self) -> &'static str {
        match self.location {
            StoreLocation::File(_) => "file",
            StoreLocation::InMemory => "memory",
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::file(DATABASE_NAME)
    }
}

fn default_schema_version() -> u32 {
    DATABASE_VERSION
}
