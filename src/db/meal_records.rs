//! Database operations for meal log records.
//!
//! Meals are append-mostly: a row is written once with its time and category
//! and never updated afterwards, only deleted by id.

use crate::db::db::Db;
use anyhow::Result;
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use std::sync::Arc;

const INSERT_MEAL: &str = "INSERT INTO meal_records (meal_time, meal_type) VALUES (?1, ?2)";
const SELECT_RECENT: &str = "SELECT id, meal_time, meal_type FROM meal_records ORDER BY id DESC LIMIT ?1";
const SELECT_IN_RANGE: &str =
    "SELECT id, meal_time, meal_type FROM meal_records WHERE meal_time >= ?1 AND meal_time <= ?2 ORDER BY meal_time DESC";
const SELECT_SINCE: &str = "SELECT id, meal_time, meal_type FROM meal_records WHERE meal_time >= ?1 ORDER BY meal_time DESC";
const DELETE_RECORD: &str = "DELETE FROM meal_records WHERE id = ?1";

/// One row of the `meal_records` table.
#[derive(Debug, Clone)]
pub struct MealRecord {
    pub id: i64,
    pub meal_time: String,
    pub meal_type: String,
}

/// Store for the `meal_records` table.
#[derive(Clone)]
pub struct MealRecords {
    conn: Arc<Mutex<Connection>>,
}

impl MealRecords {
    pub fn new(db: &Db) -> Self {
        MealRecords { conn: db.conn() }
    }

    /// Inserts a meal row and returns its id.
    pub fn insert(&self, time: &str, meal_type: &str) -> Result<i64> {
        let conn = self.conn.lock();
        conn.execute(INSERT_MEAL, params![time, meal_type])?;
        Ok(conn.last_insert_rowid())
    }

    /// Most recent meals, newest first by id.
    pub fn fetch_recent(&self, limit: u32) -> Result<Vec<MealRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(SELECT_RECENT)?;
        let rows = stmt.query_map(params![limit], Self::map_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Meals whose time falls inside `[start, end]`, newest first.
    pub fn fetch_in_range(&self, start: &str, end: &str) -> Result<Vec<MealRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(SELECT_IN_RANGE)?;
        let rows = stmt.query_map(params![start, end], Self::map_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Meals at or after the given bound, newest first.
    pub fn fetch_since(&self, start: &str) -> Result<Vec<MealRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(SELECT_SINCE)?;
        let rows = stmt.query_map(params![start], Self::map_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Deletes a row by id, returning the number of rows affected.
    pub fn delete(&self, id: i64) -> Result<usize> {
        let conn = self.conn.lock();
        Ok(conn.execute(DELETE_RECORD, params![id])?)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MealRecord> {
        Ok(MealRecord {
            id: row.get(0)?,
            meal_time: row.get(1)?,
            // Legacy rows may predate the category default
            meal_type: row.get::<_, Option<String>>(2)?.unwrap_or_else(|| "其他".to_string()),
        })
    }
}
