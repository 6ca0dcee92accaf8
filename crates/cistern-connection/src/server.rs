//! Pooled connection manager for server-hosted databases

use std::sync::Arc;

use async_trait::async_trait;
use cistern_core::{CisternError, Connection, ConnectionConfig, DatabaseDriver, Result};
use cistern_drivers::DriverRegistry;

use crate::pool::{ConnectionFactory, ConnectionPool, Lease, PoolStats};
use crate::source::ConnectionSource;

/// Factory that opens connections through a registered driver.
struct DriverFactory {
    driver: Arc<dyn DatabaseDriver>,
    config: ConnectionConfig,
}

#[async_trait]
impl ConnectionFactory for DriverFactory {
    async fn create(&self) -> Result<Arc<dyn Connection>> {
        self.driver.connect(&self.config).await
    }
}

/// Factory used when no driver is registered for the configured kind;
/// every slot records the same driver-unavailable failure.
struct UnavailableFactory {
    driver: String,
}

#[async_trait]
impl ConnectionFactory for UnavailableFactory {
    async fn create(&self) -> Result<Arc<dyn Connection>> {
        Err(CisternError::DriverUnavailable(format!(
            "No driver registered for '{}'. Enable the matching cargo feature of cistern-drivers \
             (e.g. `mysql`, `sqlite`) or register a driver at startup.",
            self.driver
        )))
    }
}

/// A bounded pool of pre-opened connections to one server-hosted database.
///
/// Every connection is opened at construction; borrowers share them under
/// backpressure and the pool never grows. Slots that fail to open are
/// logged and left absent, so a pool may run under capacity when the
/// backing server is briefly unavailable at startup.
pub struct ServerDatabase {
    database_name: String,
    driver: String,
    pool: ConnectionPool,
}

impl std::fmt::Debug for ServerDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerDatabase")
            .field("database_name", &self.database_name)
            .field("driver", &self.driver)
            .finish_non_exhaustive()
    }
}

impl ServerDatabase {
    /// Open a pool of `pool_size` connections.
    ///
    /// Missing required parameters are rejected up front; individual
    /// connections that fail to open are recorded per slot without
    /// failing construction.
    #[tracing::instrument(skip(config), fields(driver = %config.driver, database = ?config.database))]
    pub async fn connect(config: ConnectionConfig, pool_size: usize) -> Result<Self> {
        if pool_size == 0 {
            return Err(CisternError::Configuration(
                "pool_size must be at least 1".into(),
            ));
        }
        if config.host.is_empty() {
            return Err(CisternError::Configuration("host is required".into()));
        }
        let database_name = match config.database.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                return Err(CisternError::Configuration(
                    "database name is required".into(),
                ));
            }
        };
        if config.username.is_none() {
            return Err(CisternError::Configuration("username is required".into()));
        }
        if config.password.is_none() {
            return Err(CisternError::Configuration("password is required".into()));
        }

        let driver_name = config.driver.clone();
        let pool = match DriverRegistry::global().get(&driver_name) {
            Some(driver) => {
                tracing::info!(
                    url = %driver.build_connection_string(&config),
                    pool_size,
                    "initializing connection pool"
                );
                ConnectionPool::initialize(DriverFactory { driver, config }, pool_size).await
            }
            None => {
                ConnectionPool::initialize(
                    UnavailableFactory {
                        driver: driver_name.clone(),
                    },
                    pool_size,
                )
                .await
            }
        };

        Ok(Self {
            database_name,
            driver: driver_name,
            pool,
        })
    }

    /// Borrow a connection from the pool, suspending until one is idle.
    pub async fn acquire(&self) -> Result<Lease> {
        self.pool.acquire().await
    }

    /// Close every idle connection; checked-out handles stay with their
    /// callers.
    pub async fn shutdown(&self) {
        self.pool.shutdown().await
    }

    /// Pool snapshot.
    pub fn stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Name of the database the pool serves.
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Driver identifier the pool was configured with.
    pub fn driver(&self) -> &str {
        &self.driver
    }
}

#[async_trait]
impl ConnectionSource for ServerDatabase {
    fn database_name(&self) -> &str {
        &self.database_name
    }

    async fn acquire(&self) -> Result<Lease> {
        self.pool.acquire().await
    }

    async fn disconnect(&self) {
        self.pool.shutdown().await
    }
}
