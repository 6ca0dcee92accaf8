//! Cistern Connection - Connection lifecycle management
//!
//! This crate decides how connections are created, borrowed, returned,
//! and torn down. Two acquisition strategies share one capability
//! interface:
//!
//! - [`ServerDatabase`] owns a bounded pool of pre-opened connections to
//!   a server-hosted database and lends them out under backpressure.
//! - [`FileDatabase`] owns at most one lazily-opened connection to a
//!   file-backed database, provisioning the backing file from a template
//!   exactly once before the first connect.

mod file;
pub mod pool;
mod server;
mod source;

pub use file::{FileDatabase, MissingTemplate, provision};
pub use pool::{ConnectionFactory, ConnectionPool, Lease, PoolStats};
pub use server::ServerDatabase;
pub use source::ConnectionSource;
