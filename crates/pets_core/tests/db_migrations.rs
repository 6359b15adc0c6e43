use pets_core::db::migrations::latest_version;
use pets_core::db::{open_db, open_db_in_memory, DbError, StoreConfig};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_pets_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "Pets");
    assert_eq!(
        column_names(&conn),
        vec!["_id", "name", "breed", "gender", "weight"]
    );
}

#[test]
fn opening_same_database_twice_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::in_dir(dir.path());

    let conn_first = open_db(&config).unwrap();
    conn_first
        .execute("INSERT INTO Pets (name, gender) VALUES ('Toto', 1);", [])
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&config).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_eq!(pet_count(&conn_second), 1);
}

#[test]
fn schema_version_bump_wipes_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::in_dir(dir.path());

    let conn = open_db(&config).unwrap();
    conn.execute("INSERT INTO Pets (name, gender) VALUES ('Toto', 1);", [])
        .unwrap();
    drop(conn);

    let bumped = config.clone().with_schema_version(latest_version() + 1);
    let conn = open_db(&bumped).unwrap();
    assert_eq!(schema_version(&conn), latest_version() + 1);
    assert_eq!(pet_count(&conn), 0);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::in_dir(dir.path());

    let conn = match &config.location {
        pets_core::StoreLocation::File(path) => Connection::open(path).unwrap(),
        pets_core::StoreLocation::InMemory => unreachable!("file config expected"),
    };
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&config).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn opening_unreachable_path_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::file(dir.path().join("no-such-dir").join("Pets.db"));

    let err = open_db(&config).unwrap_err();
    assert!(matches!(err, DbError::Sqlite(_)));
}

#[test]
fn schema_enforces_column_constraints() {
    let conn = open_db_in_memory().unwrap();

    assert!(conn
        .execute("INSERT INTO Pets (gender) VALUES (1);", [])
        .is_err());
    assert!(conn
        .execute("INSERT INTO Pets (name) VALUES ('Toto');", [])
        .is_err());

    conn.execute("INSERT INTO Pets (name, gender) VALUES ('Toto', 1);", [])
        .unwrap();
    let weight: i64 = conn
        .query_row("SELECT weight FROM Pets;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(weight, 0);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn pet_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM Pets;", [], |row| row.get(0))
        .unwrap()
}

fn column_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn.prepare("PRAGMA table_info(Pets);").unwrap();
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    names
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
