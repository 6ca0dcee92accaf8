//! SQLite driver implementation

use async_trait::async_trait;
use cistern_core::{
    CisternError, Connection, ConnectionConfig, DatabaseDriver, DatabaseKind, Dialect, Result,
};
use std::path::Path;
use std::sync::Arc;

use crate::SqliteConnection;

/// SQLite database driver
pub struct SqliteDriver;

impl SqliteDriver {
    /// Create a new SQLite driver instance
    pub fn new() -> Self {
        tracing::debug!("SQLite driver initialized");
        Self
    }
}

impl Default for SqliteDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseDriver for SqliteDriver {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn display_name(&self) -> &'static str {
        "SQLite"
    }

    fn dialect(&self) -> Dialect {
        DatabaseKind::Sqlite.dialect()
    }

    #[tracing::instrument(skip(self, config), fields(path = ?config.path))]
    async fn connect(&self, config: &ConnectionConfig) -> Result<Arc<dyn Connection>> {
        let path = config.path.as_deref().ok_or_else(|| {
            CisternError::Configuration("SQLite requires a database file path".into())
        })?;

        let conn = SqliteConnection::open(path).map_err(|e| {
            tracing::error!(category = e.category(), error = %e, "failed to open SQLite database");
            e
        })?;

        tracing::info!(path = %path.display(), "SQLite connection created");
        Ok(Arc::new(conn))
    }

    fn build_connection_string(&self, config: &ConnectionConfig) -> String {
        let path = config.path.as_deref().unwrap_or_else(|| Path::new(""));
        format!("{}{}", self.dialect().scheme(), path.display())
    }
}
