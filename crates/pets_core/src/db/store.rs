//! Lazily opened connection owned for the lifetime of a provider.

use super::config::StoreConfig;
use super::open::open_db;
use super::DbResult;
use once_cell::sync::OnceCell;
use rusqlite::Connection;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Single shared connection to the pets database.
///
/// The connection is opened on the first call to [`PetStore::connection`] and
/// kept until the store is dropped. A failed open is not cached, so a later
/// call attempts the open again.
pub struct PetStore {
    config: StoreConfig,
    conn: OnceCell<Mutex<Connection>>,
}

impl PetStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            conn: OnceCell::new(),
        }
    }

    /// Whether the underlying connection has been opened yet.
    pub fn is_open(&self) -> bool {
        self.conn.get().is_some()
    }

    /// Returns the connection, opening it on first use.
    ///
    /// # Errors
    /// - Returns the open/bootstrap error when the database is unavailable.
    pub fn connection(&self) -> DbResult<MutexGuard<'_, Connection>> {
        let conn = self
            .conn
            .get_or_try_init(|| open_db(&self.config).map(Mutex::new))?;
        // Statements are atomic on their own; a panic mid-call leaves the
        // connection usable.
        Ok(conn.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

#[cfg(test)]
mod tests {
    use super::PetStore;
    use crate::db::StoreConfig;

    #[test]
    fn connection_opens_lazily_once() {
        let store = PetStore::new(StoreConfig::in_memory());
        assert!(!store.is_open());

        {
            let conn = store.connection().unwrap();
            conn.execute("INSERT INTO Pets (name, gender) VALUES ('Rex', 0);", [])
                .unwrap();
        }
        assert!(store.is_open());

        // Same in-memory database on the second call.
        let conn = store.connection().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM Pets;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn failed_open_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let missing_parent = dir.path().join("missing").join("Pets.db");
        let store = PetStore::new(StoreConfig::file(&missing_parent));

        assert!(store.connection().is_err());
        assert!(!store.is_open());

        std::fs::create_dir_all(missing_parent.parent().unwrap()).unwrap();
        assert!(store.connection().is_ok());
        assert!(store.is_open());
    }
}
