//! The meal log controller.
//!
//! Meals are append-only: each entry is a timestamp plus a category label,
//! defaulting to "其他" when none is given. Entries are immutable after
//! creation except for deletion by id.

use crate::db::db::Db;
use crate::db::meal_records::MealRecords;
use crate::libs::formatter;
use anyhow::Result;
use serde::Serialize;

/// Default number of entries returned by [`MealLog::list`].
pub const DEFAULT_LIST_LIMIT: u32 = 30;

/// Sentinel category used when the caller omits one.
pub const DEFAULT_MEAL_TYPE: &str = "其他";

/// A meal entry rendered for listing.
#[derive(Debug, Clone, Serialize)]
pub struct ListedMeal {
    pub id: i64,
    pub display: String,
}

/// A meal entry rendered for range filtering, with raw fields.
#[derive(Debug, Clone, Serialize)]
pub struct MealInRange {
    pub id: i64,
    pub display: String,
    pub time: String,
    #[serde(rename = "type")]
    pub meal_type: String,
}

/// Controller for the append-only meal log.
#[derive(Clone)]
pub struct MealLog {
    records: MealRecords,
}

impl MealLog {
    pub fn new(db: &Db) -> Self {
        MealLog {
            records: MealRecords::new(db),
        }
    }

    /// Logs a meal at the current time.
    pub fn log(&self, meal_type: Option<&str>) -> Result<i64> {
        let now = formatter::now_utc_string();
        self.records.insert(&now, meal_type.unwrap_or(DEFAULT_MEAL_TYPE))
    }

    /// Inserts a meal entry with a caller-provided (canonical) timestamp.
    pub fn insert_custom(&self, time: &str, meal_type: Option<&str>) -> Result<(i64, String)> {
        let category = meal_type.unwrap_or(DEFAULT_MEAL_TYPE);
        let id = self.records.insert(time, category)?;
        let display = format!("{} ({})", formatter::display_moment(time)?, category);
        Ok((id, display))
    }

    /// Deletes an entry by id, returning the number of rows removed.
    pub fn remove(&self, id: i64) -> Result<usize> {
        self.records.delete(id)
    }

    /// Most recent entries, newest first.
    pub fn list(&self, limit: u32) -> Result<Vec<ListedMeal>> {
        self.records
            .fetch_recent(limit)?
            .into_iter()
            .map(|record| {
                Ok(ListedMeal {
                    id: record.id,
                    display: format!("{} ({})", formatter::display_moment(&record.meal_time)?, record.meal_type),
                })
            })
            .collect()
    }

    /// Entries within `[start, end]`, newest first.
    pub fn list_in_range(&self, start: &str, end: &str) -> Result<Vec<MealInRange>> {
        self.records
            .fetch_in_range(start, end)?
            .into_iter()
            .map(|record| {
                Ok(MealInRange {
                    id: record.id,
                    display: format!("{} ({})", formatter::display_moment(&record.meal_time)?, record.meal_type),
                    time: record.meal_time,
                    meal_type: record.meal_type,
                })
            })
            .collect()
    }

    /// Shared access to the underlying store for aggregation queries.
    pub fn records(&self) -> &MealRecords {
        &self.records
    }
}
