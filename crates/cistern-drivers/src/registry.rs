//! Driver registry for managing available database drivers

use cistern_core::{DatabaseDriver, Dialect};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

static REGISTRY: OnceLock<DriverRegistry> = OnceLock::new();

/// Registry of available database drivers
pub struct DriverRegistry {
    drivers: HashMap<String, Arc<dyn DatabaseDriver>>,
}

impl DriverRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            drivers: HashMap::new(),
        }
    }

    /// Create a registry with all built-in drivers registered
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        #[cfg(feature = "sqlite")]
        registry.register(Arc::new(crate::sqlite::SqliteDriver::new()));
        #[cfg(feature = "mysql")]
        registry.register(Arc::new(crate::mysql::MySqlDriver::new()));

        registry
    }

    /// The shared registry, built once on first use.
    ///
    /// Registration is a one-time idempotent step: repeated calls return
    /// the same instance without re-running driver construction.
    pub fn global() -> &'static DriverRegistry {
        REGISTRY.get_or_init(DriverRegistry::with_defaults)
    }

    /// Register a new driver
    pub fn register(&mut self, driver: Arc<dyn DatabaseDriver>) {
        let name = driver.name().to_string();
        tracing::info!(driver = %name, "registering database driver");
        self.drivers.insert(name, driver);
    }

    /// Get a driver by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn DatabaseDriver>> {
        let driver = self.drivers.get(name).cloned();
        if driver.is_none() {
            tracing::warn!(driver = %name, "driver not found in registry");
        }
        driver
    }

    /// List all registered driver names
    pub fn list(&self) -> Vec<&str> {
        self.drivers.keys().map(|s| s.as_str()).collect()
    }

    /// Check if a driver is registered
    pub fn has(&self, name: &str) -> bool {
        self.drivers.contains_key(name)
    }

    /// Get the dialect for a registered driver by name
    pub fn dialect(&self, name: &str) -> Option<Dialect> {
        self.drivers.get(name).map(|driver| driver.dialect())
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
