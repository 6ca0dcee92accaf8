//! Pool statistics types

use serde::{Deserialize, Serialize};

/// Snapshot of a connection pool's current state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Configured capacity (slots requested at construction)
    capacity: usize,
    /// Connections that actually opened and still belong to the pool
    live: usize,
    /// Idle connections available for checkout
    idle: usize,
    /// Connections currently lent to callers
    checked_out: usize,
    /// Callers waiting for a connection
    waiting: usize,
}

impl PoolStats {
    /// Create new pool statistics
    pub fn new(
        capacity: usize,
        live: usize,
        idle: usize,
        checked_out: usize,
        waiting: usize,
    ) -> Self {
        Self {
            capacity,
            live,
            idle,
            checked_out,
            waiting,
        }
    }

    /// Get the configured capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the number of live connections
    pub fn live(&self) -> usize {
        self.live
    }

    /// Get the number of idle connections
    pub fn idle(&self) -> usize {
        self.idle
    }

    /// Get the number of checked-out connections
    pub fn checked_out(&self) -> usize {
        self.checked_out
    }

    /// Get the number of waiting callers
    pub fn waiting(&self) -> usize {
        self.waiting
    }

    /// Pool utilization as a fraction (0.0 to 1.0) of live connections.
    ///
    /// Returns 0.0 for a pool with no live connections.
    pub fn utilization(&self) -> f64 {
        if self.live == 0 {
            0.0
        } else {
            self.checked_out as f64 / self.live as f64
        }
    }

    /// Check if every live connection is checked out
    pub fn is_exhausted(&self) -> bool {
        self.idle == 0 && self.live > 0
    }
}

impl Default for PoolStats {
    fn default() -> Self {
        Self::new(0, 0, 0, 0, 0)
    }
}
