//! Connection trait

use crate::Result;
use async_trait::async_trait;

/// An open database session.
///
/// A handle is created and closed by a connection manager; callers borrow
/// it in between and must never close it themselves. Closed is terminal:
/// a closed handle rejects further use.
#[async_trait]
pub trait Connection: Send + Sync {
    /// The driver that produced this handle (e.g. "sqlite", "mysql").
    fn driver_name(&self) -> &str;

    /// Close the connection. Closing an already-closed handle is an error.
    async fn close(&self) -> Result<()>;

    /// Check if the connection is closed.
    fn is_closed(&self) -> bool;
}

impl std::fmt::Debug for dyn Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("driver", &self.driver_name())
            .field("closed", &self.is_closed())
            .finish()
    }
}
