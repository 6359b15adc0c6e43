//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections from a [`StoreConfig`].
//! - Configure connection pragmas.
//! - Apply the pets schema before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have the configured schema version applied.
//! - A file that cannot be opened is reported, never retried here.

use super::config::{StoreConfig, StoreLocation};
use super::migrations::{apply_schema, DATABASE_VERSION};
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::time::{Duration, Instant};

/// Opens the database described by `config` and applies the schema.
///
/// # Side effects
/// - Creates the database file when it does not exist yet.
/// - May wipe stored pets when `config.schema_version` is newer than the file.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(config: &StoreConfig) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = config.mode();
    info!("event=db_open module=db status=start mode={mode}");

    let opened = match &config.location {
        StoreLocation::File(path) => Connection::open(path),
        StoreLocation::InMemory => Connection::open_in_memory(),
    };
    let mut conn = match opened {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn, config.schema_version) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} version={} duration_ms={}",
                config.schema_version,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Opens a private in-memory database at the current schema version.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_db(&StoreConfig::in_memory().with_schema_version(DATABASE_VERSION))
}

fn bootstrap_connection(conn: &mut Connection, schema_version: u32) -> DbResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_schema(conn, schema_version)?;
    Ok(())
}
