//! Database driver trait definition

use crate::{Connection, Dialect, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

/// Connection parameters handed to a driver.
#[derive(Debug, Clone, Default)]
pub struct ConnectionConfig {
    /// Driver identifier (e.g. "mysql", "sqlite")
    pub driver: String,
    /// Host address (empty for file-backed databases)
    pub host: String,
    /// Port number (0 means the driver default)
    pub port: u16,
    /// Database name
    pub database: Option<String>,
    /// Username
    pub username: Option<String>,
    /// Password
    pub password: Option<String>,
    /// Backing file for file-backed databases
    pub path: Option<PathBuf>,
}

impl ConnectionConfig {
    /// Parameters for a server-hosted database.
    pub fn server(
        driver: &str,
        host: &str,
        port: u16,
        database: &str,
        username: &str,
        password: &str,
    ) -> Self {
        Self {
            driver: driver.to_string(),
            host: host.to_string(),
            port,
            database: Some(database.to_string()),
            username: Some(username.to_string()),
            password: Some(password.to_string()),
            path: None,
        }
    }

    /// Parameters for a file-backed database.
    pub fn file(driver: &str, path: impl Into<PathBuf>) -> Self {
        Self {
            driver: driver.to_string(),
            path: Some(path.into()),
            ..Self::default()
        }
    }
}

/// A database driver: opens connections for one database kind.
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Unique identifier for this driver (e.g. "mysql", "sqlite")
    fn name(&self) -> &'static str;

    /// Human-readable name (e.g. "MySQL", "SQLite")
    fn display_name(&self) -> &'static str {
        self.name()
    }

    /// Default connection port (None for file-backed databases)
    fn default_port(&self) -> Option<u16> {
        None
    }

    /// Connection-string scheme metadata for this driver's kind.
    fn dialect(&self) -> Dialect;

    /// Open a new connection.
    async fn connect(&self, config: &ConnectionConfig) -> Result<Arc<dyn Connection>>;

    /// Build the connection string for a configuration.
    ///
    /// The default implementation produces the server shape
    /// `<scheme>//<host>:<port>/<database>`; file-backed drivers override
    /// it with `<scheme><path>`.
    fn build_connection_string(&self, config: &ConnectionConfig) -> String {
        let port = if config.port > 0 {
            config.port
        } else {
            self.default_port().unwrap_or(0)
        };
        let database = config.database.as_deref().unwrap_or_default();
        format!(
            "{}//{}:{}/{}",
            self.dialect().scheme(),
            config.host,
            port,
            database
        )
    }
}
