//! Connection pooling for database connections
//!
//! A fixed-capacity pool that opens all of its connections up front and
//! recycles them across borrowers. Capacity is decided at construction;
//! the pool never grows, and slots whose connection fails to open are
//! simply absent.
//!
//! # Example
//!
//! ```ignore
//! use cistern_connection::pool::ConnectionPool;
//!
//! let pool = ConnectionPool::initialize(factory, 5).await;
//! let conn = pool.acquire().await?;
//! // Use connection...
//! // Connection returned to pool on drop
//! ```

mod pool;
mod stats;


pub use pool::{ConnectionFactory, ConnectionPool, Lease};
pub use stats::PoolStats;
