//! Cistern Drivers - Database driver implementations
//!
//! This crate provides concrete implementations of the driver traits
//! defined in `cistern-core`, plus the registry used to look them up by
//! dialect identifier.

#[cfg(feature = "mysql")]
pub use cistern_driver_mysql as mysql;
#[cfg(feature = "sqlite")]
pub use cistern_driver_sqlite as sqlite;

mod registry;

pub use registry::DriverRegistry;

/// Re-export commonly used types from cistern-core
pub use cistern_core::{
    CisternError, Connection, ConnectionConfig, DatabaseDriver, DatabaseKind, Dialect, Result,
};
