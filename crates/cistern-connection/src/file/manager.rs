//! Lazy file-backed connection manager

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cistern_core::{CisternError, Connection, ConnectionConfig, Result};
use cistern_drivers::DriverRegistry;
use parking_lot::Mutex;

use super::provision::{MissingTemplate, provision};
use crate::pool::Lease;
use crate::source::ConnectionSource;

/// Extension appended to derived database names when missing.
const DB_EXTENSION: &str = ".db";

/// A single lazily-opened connection to a file-backed database.
///
/// The manager holds at most one live handle, reused on every call until
/// an explicit [`disconnect`](FileDatabase::disconnect). It is not meant
/// for concurrent connect/disconnect from several owners; one logical
/// caller owns it at a time.
pub struct FileDatabase {
    database_name: String,
    source: PathBuf,
    destination: PathBuf,
    policy: MissingTemplate,
    connection: Mutex<Option<Arc<dyn Connection>>>,
}

impl FileDatabase {
    /// Create the manager and connect once.
    ///
    /// `source` names the template: an absolute path is read from disk,
    /// anything else from the bundled template resources. The
    /// destination's final component names the database, with the `.db`
    /// suffix appended when missing. Connection failures are recorded and
    /// leave the manager without a live handle; construction itself never
    /// fails.
    pub async fn open(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self::open_with_policy(source, destination, MissingTemplate::default()).await
    }

    /// Like [`open`](FileDatabase::open), choosing what to do when the
    /// template cannot be resolved.
    pub async fn open_with_policy(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        policy: MissingTemplate,
    ) -> Self {
        let destination = destination.into();
        let database_name = derive_database_name(&destination);
        let manager = Self {
            database_name,
            source: source.into(),
            destination,
            policy,
            connection: Mutex::new(None),
        };
        manager.connect().await;
        manager
    }

    /// Establish the connection if there is none.
    ///
    /// Idempotent: a live handle makes this a no-op. On failure the
    /// handle stays absent and the next call retries from scratch.
    #[tracing::instrument(skip(self), fields(database = %self.database_name))]
    pub async fn connect(&self) {
        if self.connection.lock().is_some() {
            return;
        }

        match self.establish().await {
            Ok(conn) => {
                *self.connection.lock() = Some(conn);
            }
            Err(e) => {
                tracing::error!(
                    category = e.category(),
                    error = %e,
                    "failed to establish file-backed connection"
                );
            }
        }
    }

    async fn establish(&self) -> Result<Arc<dyn Connection>> {
        let driver = DriverRegistry::global().get("sqlite").ok_or_else(|| {
            CisternError::DriverUnavailable(
                "No driver registered for 'sqlite'. Enable the `sqlite` cargo feature of \
                 cistern-drivers."
                    .into(),
            )
        })?;

        if provision(&self.source, &self.destination, self.policy).await? {
            tracing::info!(
                destination = %self.destination.display(),
                "database file provisioned from template"
            );
        }

        let config = ConnectionConfig::file("sqlite", &self.destination);
        tracing::debug!(url = %driver.build_connection_string(&config), "connecting");
        driver.connect(&config).await
    }

    /// Connect if needed, then hand out the current handle.
    ///
    /// `None` means the connect failed; the failure was already recorded.
    pub async fn connection(&self) -> Option<Arc<dyn Connection>> {
        self.connect().await;
        self.connection.lock().clone()
    }

    /// Close the live handle, if any. Close errors are swallowed; the
    /// manager stays ready for a future [`connect`](FileDatabase::connect).
    pub async fn disconnect(&self) {
        let conn = self.connection.lock().take();
        if let Some(conn) = conn {
            if let Err(e) = conn.close().await {
                tracing::debug!(
                    category = e.category(),
                    error = %e,
                    "ignoring error while closing file-backed connection"
                );
            }
        }
    }

    /// Derived database name (`.db`-suffixed final path component).
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Path of the backing database file.
    pub fn destination(&self) -> &Path {
        &self.destination
    }
}

fn derive_database_name(destination: &Path) -> String {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if name.ends_with(DB_EXTENSION) {
        name
    } else {
        format!("{name}{DB_EXTENSION}")
    }
}

#[async_trait]
impl ConnectionSource for FileDatabase {
    fn database_name(&self) -> &str {
        &self.database_name
    }

    async fn acquire(&self) -> Result<Lease> {
        match self.connection().await {
            Some(conn) => Ok(Lease::detached(conn)),
            None => Err(CisternError::Connection(format!(
                "no live connection for '{}'",
                self.database_name
            ))),
        }
    }

    async fn disconnect(&self) {
        FileDatabase::disconnect(self).await;
    }
}
