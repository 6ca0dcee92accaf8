//! MySQL driver implementation

use async_trait::async_trait;
use cistern_core::{
    CisternError, Connection, ConnectionConfig, DatabaseDriver, DatabaseKind, Dialect, Result,
};
use std::sync::Arc;

use crate::MySqlConnection;

/// MySQL database driver
pub struct MySqlDriver;

impl MySqlDriver {
    /// Create a new MySQL driver instance
    pub fn new() -> Self {
        tracing::debug!("MySQL driver initialized");
        Self
    }
}

impl Default for MySqlDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseDriver for MySqlDriver {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn display_name(&self) -> &'static str {
        "MySQL"
    }

    fn default_port(&self) -> Option<u16> {
        Some(3306)
    }

    fn dialect(&self) -> Dialect {
        DatabaseKind::MySql.dialect()
    }

    #[tracing::instrument(skip(self, config), fields(host = %config.host, database = ?config.database))]
    async fn connect(&self, config: &ConnectionConfig) -> Result<Arc<dyn Connection>> {
        if config.host.is_empty() {
            return Err(CisternError::Configuration(
                "MySQL requires a host".into(),
            ));
        }
        let port = if config.port > 0 { config.port } else { 3306 };

        let conn = MySqlConnection::connect(
            &config.host,
            port,
            config.database.as_deref(),
            config.username.as_deref(),
            config.password.as_deref(),
        )
        .await
        .map_err(|e| {
            tracing::error!(category = e.category(), error = %e, "failed to connect to MySQL server");
            e
        })?;

        tracing::info!(host = %config.host, port = %port, "MySQL connection created");
        Ok(Arc::new(conn))
    }
}
