//! Capability interface shared by the connection managers

use async_trait::async_trait;
use cistern_core::Result;

use crate::pool::Lease;

/// A source of borrowable database connections.
///
/// Each manager implements the same contract with its own resource
/// strategy: the pooled variant lends one of N pre-opened handles, the
/// file-backed variant lends its single lazily-opened handle. Releasing
/// is the [`Lease`] drop in both cases.
#[async_trait]
pub trait ConnectionSource: Send + Sync {
    /// Name of the database this source serves.
    fn database_name(&self) -> &str;

    /// Borrow a live connection.
    async fn acquire(&self) -> Result<Lease>;

    /// Tear down the connections this source holds. Handles checked out
    /// to callers are not forcibly closed.
    async fn disconnect(&self);
}
