//! Versioned schema migrations for the tracker database.
//!
//! Every migration runs inside its own transaction and is recorded in the
//! `migrations` bookkeeping table, so a database can be opened by any newer
//! build and end up with the current schema. Migrations are registered in
//! sequential version order and applied exactly once.

use anyhow::Result;
use rusqlite::{params, Connection, Transaction};

/// Bookkeeping table recording every applied migration.
const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

const SELECT_VERSION: &str = "SELECT COALESCE(MAX(version), 0) FROM migrations";
const INSERT_MIGRATION: &str = "INSERT INTO migrations (version, name) VALUES (?1, ?2)";

/// A single schema change with its version and transformation logic.
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> Result<()>,
}

/// All migrations, in the order they must be applied.
fn registry() -> Vec<Migration> {
    vec![Migration {
        version: 1,
        name: "create_sleep_and_meal_records",
        up: migrate_v1,
    }]
}

/// Applies every pending migration to the given connection.
pub fn apply(conn: &mut Connection) -> Result<()> {
    conn.execute(MIGRATIONS_TABLE, [])?;
    let current = current_version(conn)?;

    for migration in registry() {
        if migration.version <= current {
            continue;
        }
        let tx = conn.transaction()?;
        (migration.up)(&tx)?;
        tx.execute(INSERT_MIGRATION, params![migration.version, migration.name])?;
        tx.commit()?;
        tracing::info!(version = migration.version, name = migration.name, "applied migration");
    }

    Ok(())
}

/// Returns the highest applied migration version (0 for a fresh database).
pub fn current_version(conn: &Connection) -> Result<u32> {
    let version: u32 = conn.query_row(SELECT_VERSION, [], |row| row.get(0))?;
    Ok(version)
}

/// Initial schema: the two record tables and their range-query indexes.
fn migrate_v1(tx: &Transaction) -> Result<()> {
    tx.execute(
        "CREATE TABLE IF NOT EXISTS sleep_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            sleep_start TEXT NOT NULL,
            sleep_end TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;
    tx.execute(
        "CREATE TABLE IF NOT EXISTS meal_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            meal_time TEXT NOT NULL,
            meal_type TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;
    tx.execute("CREATE INDEX IF NOT EXISTS idx_sleep_records_start ON sleep_records(sleep_start)", [])?;
    tx.execute("CREATE INDEX IF NOT EXISTS idx_meal_records_time ON meal_records(meal_time)", [])?;
    Ok(())
}
