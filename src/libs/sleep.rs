//! The sleep session state machine.
//!
//! A session is **open** while its row has no end timestamp and **closed**
//! once both endpoints are set. The state is never cached in the process:
//! every operation re-derives it by querying for the most recent open row,
//! so the store stays the sole source of truth.
//!
//! Two deliberately forgiving transitions:
//! - `start()` while a session is already open overwrites that session's
//!   start instead of inserting a second open row (double-click guard; the
//!   at-most-one-open invariant is maintained by overwrite, not rejection).
//! - `end()` with no open session inserts a degenerate closed row with
//!   `start == end` rather than failing.
//!
//! The read-then-write pair inside `start`/`end` is not wrapped in a
//! transaction; concurrent callers can race. Known limitation for this
//! single-user tool.

use crate::db::db::Db;
use crate::db::sleep_records::SleepRecords;
use crate::libs::formatter;
use crate::libs::messages::Message;
use anyhow::{Context, Result};
use serde::Serialize;

/// Default number of sessions returned by [`SleepTracker::list`].
pub const DEFAULT_LIST_LIMIT: u32 = 50;

/// Result of a `start` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// A fresh open session was created.
    Started { id: i64 },
    /// An open session already existed; its start was moved to now.
    Restarted { id: i64 },
}

/// Result of an `end` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndOutcome {
    /// The open session was closed; `display` covers `[start, now]`.
    Completed { id: i64, display: String },
    /// No open session existed; a zero-length closed row was recorded.
    WithoutStart { id: i64 },
}

/// Snapshot of the current open-session state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepStatus {
    pub is_sleeping: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

/// A closed session rendered for listing.
#[derive(Debug, Clone, Serialize)]
pub struct ListedSession {
    pub id: i64,
    pub display: String,
}

/// A closed session rendered for range filtering, with raw endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct SessionInRange {
    pub id: i64,
    pub display: String,
    pub start: String,
    pub end: String,
}

/// Controller for the open/closed sleep session lifecycle.
#[derive(Clone)]
pub struct SleepTracker {
    records: SleepRecords,
}

impl SleepTracker {
    pub fn new(db: &Db) -> Self {
        SleepTracker {
            records: SleepRecords::new(db),
        }
    }

    /// Starts a sleep session, or re-stamps the one already open.
    ///
    /// Store failures carry the message callers surface: [`Message::DbError`]
    /// for lookups and inserts, [`Message::UpdateFailed`] for the overwrite.
    pub fn start(&self) -> Result<StartOutcome> {
        let now = formatter::now_utc_string();
        match self.records.find_open().context(Message::DbError)? {
            Some(open) => {
                self.records.update_start(open.id, &now, &now).context(Message::UpdateFailed)?;
                Ok(StartOutcome::Restarted { id: open.id })
            }
            None => {
                let id = self.records.insert_open(&now).context(Message::DbError)?;
                Ok(StartOutcome::Started { id })
            }
        }
    }

    /// Ends the open sleep session, or records a degenerate one.
    pub fn end(&self) -> Result<EndOutcome> {
        let now = formatter::now_utc_string();
        match self.records.find_open().context(Message::DbError)? {
            Some(open) => {
                self.records.close(open.id, &now, &now).context(Message::UpdateFailed)?;
                let display = formatter::display_session(&open.sleep_start, &now)?;
                Ok(EndOutcome::Completed { id: open.id, display })
            }
            None => {
                let id = self.records.insert_closed(&now, &now).context(Message::DbError)?;
                Ok(EndOutcome::WithoutStart { id })
            }
        }
    }

    /// Reports whether a session is currently open.
    pub fn status(&self) -> Result<SleepStatus> {
        Ok(match self.records.find_open()? {
            Some(open) => SleepStatus {
                is_sleeping: true,
                start_time: Some(open.sleep_start),
                id: Some(open.id),
            },
            None => SleepStatus {
                is_sleeping: false,
                start_time: None,
                id: None,
            },
        })
    }

    /// Inserts a closed session with caller-provided endpoints.
    ///
    /// Bypasses the open-session guard; both timestamps must already be in
    /// canonical form. Overlapping or inverted sessions are accepted.
    pub fn insert_custom(&self, start: &str, end: &str) -> Result<(i64, String)> {
        let id = self.records.insert_closed(start, end)?;
        let display = formatter::display_session(start, end)?;
        Ok((id, display))
    }

    /// Deletes a session by id, returning the number of rows removed.
    pub fn remove(&self, id: i64) -> Result<usize> {
        self.records.delete(id)
    }

    /// Closed sessions, newest first by id. Open sessions never appear.
    pub fn list(&self, limit: u32) -> Result<Vec<ListedSession>> {
        self.records
            .fetch_closed(limit)?
            .into_iter()
            .map(|record| {
                let end = record.sleep_end.as_deref().unwrap_or(&record.sleep_start);
                Ok(ListedSession {
                    id: record.id,
                    display: formatter::display_session(&record.sleep_start, end)?,
                })
            })
            .collect()
    }

    /// Closed sessions starting within `[start, end]`, newest first.
    pub fn list_in_range(&self, start: &str, end: &str) -> Result<Vec<SessionInRange>> {
        self.records
            .fetch_closed_in_range(start, end)?
            .into_iter()
            .map(|record| {
                let session_end = record.sleep_end.clone().unwrap_or_else(|| record.sleep_start.clone());
                Ok(SessionInRange {
                    id: record.id,
                    display: formatter::display_session(&record.sleep_start, &session_end)?,
                    start: record.sleep_start,
                    end: session_end,
                })
            })
            .collect()
    }

    /// Shared access to the underlying store for aggregation queries.
    pub fn records(&self) -> &SleepRecords {
        &self.records
    }
}
