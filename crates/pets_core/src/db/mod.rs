//! SQLite storage bootstrap for the pets table.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the pets store.
//! - Create the `Pets` table on first open and rebuild it on version bumps.
//! - Hold the lazily opened, process-lifetime connection used by the provider.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Upgrades are destructive: every stored pet is dropped.
//! - Provider code must not touch the `Pets` table before the schema is applied.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod config;
pub mod migrations;
mod open;
mod store;

pub use config::{StoreConfig, StoreLocation, DATABASE_NAME};
pub use open::{open_db, open_db_in_memory};
pub use store::PetStore;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    InvalidVersion {
        from: u32,
        to: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::InvalidVersion { from, to } => {
                write!(f, "invalid schema version transition {from} -> {to}")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::InvalidVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
