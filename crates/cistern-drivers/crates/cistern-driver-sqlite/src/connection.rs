//! SQLite connection implementation

use async_trait::async_trait;
use cistern_core::{CisternError, Connection, Result};
use parking_lot::Mutex;
use rusqlite::{Connection as RusqliteConnection, OpenFlags};
use std::path::Path;

/// SQLite connection wrapper
///
/// The underlying rusqlite handle is not `Sync`, so it lives behind a
/// mutex; `None` marks a closed connection.
pub struct SqliteConnection {
    conn: Mutex<Option<RusqliteConnection>>,
}

impl SqliteConnection {
    /// Open a SQLite database file.
    ///
    /// SQLite reads the file lazily, so opening neither validates nor
    /// modifies its contents.
    pub fn open(path: &Path) -> Result<Self> {
        tracing::info!(path = %path.display(), "opening SQLite database");

        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = RusqliteConnection::open_with_flags(path, flags).map_err(|e| {
            CisternError::Connection(format!(
                "Failed to open SQLite database at '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(Self {
            conn: Mutex::new(Some(conn)),
        })
    }
}

#[async_trait]
impl Connection for SqliteConnection {
    fn driver_name(&self) -> &str {
        "sqlite"
    }

    async fn close(&self) -> Result<()> {
        tracing::info!("closing SQLite connection");
        let conn = self.conn.lock().take();
        match conn {
            // On failure rusqlite hands the handle back; dropping it here
            // still releases the file, and the wrapper stays closed.
            Some(conn) => conn.close().map_err(|(_conn, e)| {
                CisternError::Teardown(format!("Failed to close SQLite connection: {e}"))
            }),
            None => Err(CisternError::Teardown(
                "SQLite connection already closed".into(),
            )),
        }
    }

    fn is_closed(&self) -> bool {
        self.conn.lock().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_close_lifecycle() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("lifecycle.db");

        let conn = SqliteConnection::open(&path).expect("open");
        assert_eq!(conn.driver_name(), "sqlite");
        assert!(!conn.is_closed());

        conn.close().await.expect("close");
        assert!(conn.is_closed());

        let err = conn.close().await.expect_err("second close rejected");
        assert_eq!(err.category(), "teardown");
    }

    #[tokio::test]
    async fn open_leaves_existing_bytes_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("seeded.db");
        std::fs::write(&path, b"TEMPLATE").expect("seed file");

        let conn = SqliteConnection::open(&path).expect("open succeeds lazily");
        assert!(!conn.is_closed());
        drop(conn);

        let bytes = std::fs::read(&path).expect("read back");
        assert_eq!(bytes, b"TEMPLATE");
    }
}
