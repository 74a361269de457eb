//! Record filtering and trailing-window statistics.
//!
//! Aggregation is read-only and always recomputed from the store: sums and
//! per-day buckets over the closed sleep sessions of the trailing window,
//! plus per-category meal counts. Minutes are bucketed by the *local*
//! calendar date of the session start.

use crate::libs::formatter;
use crate::libs::meal::{MealInRange, MealLog};
use crate::libs::messages::Message;
use crate::libs::sleep::{SessionInRange, SleepTracker};
use crate::msg_error_anyhow;
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Default trailing window for statistics, in days.
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Start instant of a trailing `days`-day window, if representable.
///
/// `days` comes straight from the query string; values outside what
/// `chrono` can represent yield `None` instead of panicking.
pub fn window_start(days: i64) -> Option<DateTime<Utc>> {
    Utc::now().checked_sub_signed(Duration::try_days(days)?)
}

/// Which record collection a filter query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Sleep,
    Meal,
}

impl FromStr for RecordKind {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "sleep" => Ok(RecordKind::Sleep),
            "meal" => Ok(RecordKind::Meal),
            _ => Err(()),
        }
    }
}

/// Records matched by a range filter, per kind.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FilteredRecords {
    Sleep(Vec<SessionInRange>),
    Meal(Vec<MealInRange>),
}

/// Sleep aggregates over the trailing window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepStats {
    pub total_records: usize,
    pub total_minutes: i64,
    pub total_hours: f64,
    pub avg_minutes: i64,
    pub avg_hours: f64,
    /// Minutes slept per local calendar date ("YYYY-MM-DD").
    pub by_date: BTreeMap<String, i64>,
}

/// Meal aggregates over the trailing window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealStats {
    pub total_records: usize,
    pub by_type: BTreeMap<String, i64>,
}

/// Complete statistics report for a trailing window of days.
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsReport {
    pub days: i64,
    pub sleep: SleepStats,
    pub meals: MealStats,
}

/// Query service over both record collections.
#[derive(Clone)]
pub struct RecordQuery {
    sleep: SleepTracker,
    meals: MealLog,
}

impl RecordQuery {
    pub fn new(sleep: SleepTracker, meals: MealLog) -> Self {
        RecordQuery { sleep, meals }
    }

    /// Lists records of the given kind inside `[start, end]`.
    ///
    /// Bounds must already be normalized to the canonical storage form;
    /// comparison happens lexicographically in SQL, which is sound because
    /// the canonical representation is monotonic in time.
    pub fn filter(&self, kind: RecordKind, start: &str, end: &str) -> Result<FilteredRecords> {
        Ok(match kind {
            RecordKind::Sleep => FilteredRecords::Sleep(self.sleep.list_in_range(start, end)?),
            RecordKind::Meal => FilteredRecords::Meal(self.meals.list_in_range(start, end)?),
        })
    }

    /// Aggregates sleep and meal records over the trailing `days`-day window.
    pub fn statistics(&self, days: i64) -> Result<StatisticsReport> {
        let window_start = window_start(days).ok_or_else(|| msg_error_anyhow!(Message::InvalidWindowDays(days)))?;
        let window_start = formatter::to_storage_string(window_start);

        let sessions = self.sleep.records().fetch_closed_since(&window_start)?;
        let mut total_minutes = 0i64;
        let mut by_date: BTreeMap<String, i64> = BTreeMap::new();
        for session in &sessions {
            let end = session.sleep_end.as_deref().unwrap_or(&session.sleep_start);
            let duration = formatter::sleep_duration(&session.sleep_start, end)?;
            total_minutes += duration.total_minutes;
            *by_date.entry(formatter::local_date_key(&session.sleep_start)?).or_insert(0) += duration.total_minutes;
        }

        let avg_minutes = if sessions.is_empty() {
            0
        } else {
            (total_minutes as f64 / sessions.len() as f64).round() as i64
        };

        let meals = self.meals.records().fetch_since(&window_start)?;
        let mut by_type: BTreeMap<String, i64> = BTreeMap::new();
        for meal in &meals {
            *by_type.entry(meal.meal_type.clone()).or_insert(0) += 1;
        }

        Ok(StatisticsReport {
            days,
            sleep: SleepStats {
                total_records: sessions.len(),
                total_minutes,
                total_hours: one_decimal(total_minutes as f64 / 60.0),
                avg_minutes,
                avg_hours: one_decimal(avg_minutes as f64 / 60.0),
                by_date,
            },
            meals: MealStats {
                total_records: meals.len(),
                by_type,
            },
        })
    }
}

fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
