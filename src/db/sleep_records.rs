//! Database operations for sleep session records.
//!
//! A sleep session is a single row: an open session has `sleep_end IS NULL`,
//! a closed one carries both endpoints. At most one open row exists under
//! normal operation; the controller in [`crate::libs::sleep`] maintains that
//! invariant by overwriting the open row's start rather than inserting a
//! second one. Custom inserts go straight to a closed row and bypass the
//! guard entirely.

use crate::db::db::Db;
use anyhow::Result;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Arc;

const INSERT_OPEN: &str = "INSERT INTO sleep_records (sleep_start) VALUES (?1)";
const INSERT_CLOSED: &str = "INSERT INTO sleep_records (sleep_start, sleep_end) VALUES (?1, ?2)";
const UPDATE_START: &str = "UPDATE sleep_records SET sleep_start = ?1, updated_at = ?2 WHERE id = ?3";
const UPDATE_END: &str = "UPDATE sleep_records SET sleep_end = ?1, updated_at = ?2 WHERE id = ?3";

/// Most recent row still missing its end timestamp.
const SELECT_OPEN: &str = "SELECT id, sleep_start, sleep_end FROM sleep_records WHERE sleep_end IS NULL ORDER BY id DESC LIMIT 1";
const SELECT_CLOSED: &str = "SELECT id, sleep_start, sleep_end FROM sleep_records WHERE sleep_end IS NOT NULL ORDER BY id DESC LIMIT ?1";
const SELECT_CLOSED_IN_RANGE: &str = "SELECT id, sleep_start, sleep_end FROM sleep_records \
    WHERE sleep_end IS NOT NULL AND sleep_start >= ?1 AND sleep_start <= ?2 ORDER BY sleep_start DESC";
const SELECT_CLOSED_SINCE: &str =
    "SELECT id, sleep_start, sleep_end FROM sleep_records WHERE sleep_end IS NOT NULL AND sleep_start >= ?1 ORDER BY sleep_start DESC";

const DELETE_RECORD: &str = "DELETE FROM sleep_records WHERE id = ?1";

/// One row of the `sleep_records` table.
#[derive(Debug, Clone)]
pub struct SleepRecord {
    pub id: i64,
    pub sleep_start: String,
    pub sleep_end: Option<String>,
}

/// Store for the `sleep_records` table.
///
/// Borrows the shared connection from [`Db`], so the store can be cloned
/// into the HTTP state and used from concurrent handlers; the mutex
/// serializes individual statements, not whole request flows.
#[derive(Clone)]
pub struct SleepRecords {
    conn: Arc<Mutex<Connection>>,
}

impl SleepRecords {
    pub fn new(db: &Db) -> Self {
        SleepRecords { conn: db.conn() }
    }

    /// Inserts a new open session and returns its id.
    pub fn insert_open(&self, start: &str) -> Result<i64> {
        let conn = self.conn.lock();
        conn.execute(INSERT_OPEN, params![start])?;
        Ok(conn.last_insert_rowid())
    }

    /// Inserts an already-closed session and returns its id.
    pub fn insert_closed(&self, start: &str, end: &str) -> Result<i64> {
        let conn = self.conn.lock();
        conn.execute(INSERT_CLOSED, params![start, end])?;
        Ok(conn.last_insert_rowid())
    }

    /// Overwrites the start of an existing row, bumping `updated_at`.
    pub fn update_start(&self, id: i64, start: &str, touched_at: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(UPDATE_START, params![start, touched_at, id])?;
        Ok(())
    }

    /// Sets the end timestamp of an open row, closing the session.
    pub fn close(&self, id: i64, end: &str, touched_at: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(UPDATE_END, params![end, touched_at, id])?;
        Ok(())
    }

    /// Returns the most recent open session, if any.
    pub fn find_open(&self) -> Result<Option<SleepRecord>> {
        let conn = self.conn.lock();
        let record = conn.query_row(SELECT_OPEN, [], Self::map_row).optional()?;
        Ok(record)
    }

    /// Closed sessions, newest first by id.
    pub fn fetch_closed(&self, limit: u32) -> Result<Vec<SleepRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(SELECT_CLOSED)?;
        let rows = stmt.query_map(params![limit], Self::map_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Closed sessions whose start falls inside `[start, end]`, newest first.
    pub fn fetch_closed_in_range(&self, start: &str, end: &str) -> Result<Vec<SleepRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(SELECT_CLOSED_IN_RANGE)?;
        let rows = stmt.query_map(params![start, end], Self::map_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Closed sessions starting at or after the given bound, newest first.
    pub fn fetch_closed_since(&self, start: &str) -> Result<Vec<SleepRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(SELECT_CLOSED_SINCE)?;
        let rows = stmt.query_map(params![start], Self::map_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Deletes a row by id, returning the number of rows affected.
    pub fn delete(&self, id: i64) -> Result<usize> {
        let conn = self.conn.lock();
        Ok(conn.execute(DELETE_RECORD, params![id])?)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SleepRecord> {
        Ok(SleepRecord {
            id: row.get(0)?,
            sleep_start: row.get(1)?,
            sleep_end: row.get(2)?,
        })
    }
}
