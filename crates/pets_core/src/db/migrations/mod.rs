//! Pets schema creation and destructive upgrade.
//!
//! # Responsibility
//! - Create the single `Pets` table on a fresh database.
//! - Rebuild the table from scratch when the schema version moves forward.
//!
//! # Invariants
//! - The applied version is mirrored to `PRAGMA user_version`.
//! - An upgrade never preserves rows; callers bumping the version lose data.
//! - Downgrades are refused rather than guessed at.

use crate::db::{DbError, DbResult};
use log::{info, warn};
use rusqlite::Connection;

/// Schema version written by this binary.
pub const DATABASE_VERSION: u32 = 1;

const CREATE_PETS_SQL: &str = include_str!("create_pets.sql");
const DROP_PETS_SQL: &str = "DROP TABLE IF EXISTS Pets;";

/// Returns the latest schema version known by this binary.
pub fn latest_version() -> u32 {
    DATABASE_VERSION
}

/// Brings `conn` to `target_version`.
///
/// - Fresh database (`user_version = 0`): creates the table.
/// - Older version: runs [`upgrade`], dropping all rows.
/// - Same version: no-op.
/// - Newer version: [`DbError::UnsupportedSchemaVersion`].
pub fn apply_schema(conn: &mut Connection, target_version: u32) -> DbResult<()> {
    let current_version = current_user_version(conn)?;

    if target_version == 0 {
        return Err(DbError::InvalidVersion {
            from: current_version,
            to: target_version,
        });
    }

    if current_version > target_version {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: target_version,
        });
    }

    if current_version == target_version {
        return Ok(());
    }

    if current_version == 0 {
        let tx = conn.transaction()?;
        tx.execute_batch(CREATE_PETS_SQL)?;
        tx.execute_batch(&format!("PRAGMA user_version = {target_version};"))?;
        tx.commit()?;
        info!("event=db_create module=db status=ok version={target_version}");
        return Ok(());
    }

    upgrade(conn, current_version, target_version)
}

/// Drops and recreates the `Pets` table, then stamps `to` as the version.
///
/// # Side effects
/// - Irreversibly deletes every stored pet.
///
/// # Errors
/// - [`DbError::InvalidVersion`] when `from >= to`.
pub fn upgrade(conn: &mut Connection, from: u32, to: u32) -> DbResult<()> {
    if from >= to {
        return Err(DbError::InvalidVersion { from, to });
    }

    warn!("event=db_upgrade module=db status=start from={from} to={to} destructive=true");

    let tx = conn.transaction()?;
    tx.execute_batch(DROP_PETS_SQL)?;
    tx.execute_batch(CREATE_PETS_SQL)?;
    tx.execute_batch(&format!("PRAGMA user_version = {to};"))?;
    tx.commit()?;

    info!("event=db_upgrade module=db status=ok from={from} to={to}");
    Ok(())
}

/// Reads `PRAGMA user_version`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::{apply_schema, current_user_version, upgrade, DATABASE_VERSION};
    use crate::db::DbError;
    use rusqlite::Connection;

    fn pet_count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM Pets;", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn fresh_database_gets_table_and_version() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_schema(&mut conn, DATABASE_VERSION).unwrap();

        assert_eq!(current_user_version(&conn).unwrap(), DATABASE_VERSION);
        assert_eq!(pet_count(&conn), 0);
    }

    #[test]
    fn applying_same_version_twice_keeps_rows() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_schema(&mut conn, 1).unwrap();
        conn.execute(
            "INSERT INTO Pets (name, gender) VALUES ('Toto', 1);",
            [],
        )
        .unwrap();

        apply_schema(&mut conn, 1).unwrap();
        assert_eq!(pet_count(&conn), 1);
    }

    #[test]
    fn upgrade_drops_rows_and_recreates_table() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_schema(&mut conn, 1).unwrap();
        conn.execute(
            "INSERT INTO Pets (name, gender, weight) VALUES ('Toto', 1, 7);",
            [],
        )
        .unwrap();

        apply_schema(&mut conn, 2).unwrap();

        assert_eq!(current_user_version(&conn).unwrap(), 2);
        assert_eq!(pet_count(&conn), 0);
    }

    #[test]
    fn upgrade_rejects_non_increasing_versions() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_schema(&mut conn, 2).unwrap();

        let err = upgrade(&mut conn, 2, 2).unwrap_err();
        assert!(matches!(err, DbError::InvalidVersion { from: 2, to: 2 }));
    }

    #[test]
    fn newer_database_version_is_refused() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA user_version = 5;").unwrap();

        let err = apply_schema(&mut conn, 1).unwrap_err();
        assert!(matches!(
            err,
            DbError::UnsupportedSchemaVersion {
                db_version: 5,
                latest_supported: 1
            }
        ));
    }

    #[test]
    fn zero_target_version_is_invalid() {
        let mut conn = Connection::open_in_memory().unwrap();
        let err = apply_schema(&mut conn, 0).unwrap_err();
        assert!(matches!(err, DbError::InvalidVersion { from: 0, to: 0 }));
    }
}
