use crate::db::migrations;
use crate::libs::data_storage::DataStorage;
use anyhow::Result;
use parking_lot::Mutex;
use rusqlite::Connection;
use std::sync::Arc;
use std::time::Duration;

pub const DB_FILE_NAME: &str = "bodylog.db";

/// Handle to the application database.
///
/// `rusqlite::Connection` is not `Sync`, so the connection lives behind an
/// `Arc<Mutex<_>>` and every store built from the same `Db` shares it. One
/// connection per process; a second process waits on the busy timeout
/// instead of failing with `SQLITE_BUSY`.
pub struct Db {
    conn: Arc<Mutex<Connection>>,
}

impl Db {
    /// Opens the application database and brings the schema up to date.
    pub fn new() -> Result<Db> {
        let db_file_path = DataStorage::new().get_path(DB_FILE_NAME)?;
        let mut conn = Connection::open(db_file_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        migrations::apply(&mut conn)?;

        Ok(Db {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Shared handle to the underlying connection.
    pub fn conn(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }
}
