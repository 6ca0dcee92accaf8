//! Connection pool implementation

use std::collections::VecDeque;
use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use cistern_core::{CisternError, Connection, Result};
use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use super::stats::PoolStats;

/// Factory trait for opening new connections
#[async_trait]
pub trait ConnectionFactory: Send + Sync + 'static {
    /// Open a new connection
    async fn create(&self) -> Result<Arc<dyn Connection>>;
}

#[async_trait]
impl<T: ConnectionFactory> ConnectionFactory for Arc<T> {
    async fn create(&self) -> Result<Arc<dyn Connection>> {
        (**self).create().await
    }
}

/// Pool state shared with outstanding leases.
struct PoolCore {
    /// Idle connections available for checkout
    idle: Mutex<VecDeque<Arc<dyn Connection>>>,
    /// Permit count tracks the idle set; closed on shutdown
    semaphore: Arc<Semaphore>,
    /// Slots requested at construction
    capacity: usize,
    /// Connections that opened and still belong to the pool
    live: AtomicUsize,
    /// Connections currently lent out
    checked_out: AtomicUsize,
    /// Callers suspended in `acquire`
    waiting: AtomicUsize,
    shut_down: AtomicBool,
}

/// Decrements the waiting counter even when the acquire future is
/// cancelled mid-await.
struct WaitGuard<'a>(&'a AtomicUsize);

impl Drop for WaitGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A fixed-capacity pool of pre-opened database connections.
///
/// All connections are opened at construction; borrowers recycle them
/// through [`Lease`] guards. A fully checked-out pool suspends new
/// borrowers until a lease is dropped - deliberately without a timeout,
/// as backpressure.
pub struct ConnectionPool {
    core: Arc<PoolCore>,
}

impl ConnectionPool {
    /// Open `capacity` connections through the factory.
    ///
    /// A slot whose connection fails to open is logged and left absent;
    /// the pool runs under capacity rather than failing construction.
    pub async fn initialize<F: ConnectionFactory>(factory: F, capacity: usize) -> Self {
        let mut idle = VecDeque::with_capacity(capacity);
        for slot in 0..capacity {
            match factory.create().await {
                Ok(conn) => idle.push_back(conn),
                Err(e) => {
                    tracing::error!(
                        slot,
                        category = e.category(),
                        error = %e,
                        "failed to open pooled connection"
                    );
                }
            }
        }

        let live = idle.len();
        if live < capacity {
            tracing::warn!(capacity, live, "pool constructed under capacity");
        }

        Self {
            core: Arc::new(PoolCore {
                semaphore: Arc::new(Semaphore::new(live)),
                idle: Mutex::new(idle),
                capacity,
                live: AtomicUsize::new(live),
                checked_out: AtomicUsize::new(0),
                waiting: AtomicUsize::new(0),
                shut_down: AtomicBool::new(false),
            }),
        }
    }

    /// Borrow a connection, suspending until one is idle.
    ///
    /// There is no timeout: with every connection checked out the caller
    /// waits until a lease is dropped. The only error is a pool that has
    /// been shut down.
    pub async fn acquire(&self) -> Result<Lease> {
        self.core.waiting.fetch_add(1, Ordering::SeqCst);
        let permit = {
            let _wait = WaitGuard(&self.core.waiting);
            self.core
                .semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| CisternError::Connection("pool is shut down".into()))?
        };

        let connection = self.core.idle.lock().pop_front();
        match connection {
            Some(connection) => {
                self.core.checked_out.fetch_add(1, Ordering::SeqCst);
                Ok(Lease {
                    connection: Some(connection),
                    pool: Some(self.core.clone()),
                    _permit: Some(permit),
                })
            }
            None => {
                // Shutdown drained the idle set between our permit and the
                // pop; the permit no longer stands for a connection.
                permit.forget();
                Err(CisternError::Connection("pool is shut down".into()))
            }
        }
    }

    /// Close every idle connection and refuse further borrows.
    ///
    /// Checked-out handles are left with their callers; their leases
    /// close them on drop instead of re-pooling. Not synchronized
    /// against concurrent `acquire`: a racing borrower observes either a
    /// live pool or the shutdown error.
    pub async fn shutdown(&self) {
        tracing::info!(capacity = self.core.capacity, "shutting down connection pool");
        self.core.shut_down.store(true, Ordering::SeqCst);
        self.core.semaphore.close();

        let drained: Vec<_> = { self.core.idle.lock().drain(..).collect() };
        for conn in drained {
            self.core.live.fetch_sub(1, Ordering::SeqCst);
            if let Err(e) = conn.close().await {
                tracing::error!(
                    category = e.category(),
                    error = %e,
                    "error closing pooled connection"
                );
            }
        }
    }

    /// Get current pool statistics
    pub fn stats(&self) -> PoolStats {
        let idle = self.core.idle.lock().len();
        PoolStats::new(
            self.core.capacity,
            self.core.live.load(Ordering::SeqCst),
            idle,
            self.core.checked_out.load(Ordering::SeqCst),
            self.core.waiting.load(Ordering::SeqCst),
        )
    }

    /// Configured capacity (slots requested at construction)
    pub fn capacity(&self) -> usize {
        self.core.capacity
    }
}

/// A connection borrowed from a manager.
///
/// Dropping the lease is the release: pool-backed leases return the
/// handle to the idle set and wake one waiter; detached leases (handed
/// out by the lazy manager) just drop their reference, since the manager
/// keeps the handle.
pub struct Lease {
    connection: Option<Arc<dyn Connection>>,
    pool: Option<Arc<PoolCore>>,
    _permit: Option<OwnedSemaphorePermit>,
}

impl std::fmt::Debug for Lease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lease")
            .field(
                "connection",
                &self.connection.as_ref().map(|c| c.driver_name()),
            )
            .field("pooled", &self.pool.is_some())
            .finish()
    }
}

impl Lease {
    /// A lease over a handle that stays owned by its manager.
    pub(crate) fn detached(connection: Arc<dyn Connection>) -> Self {
        Self {
            connection: Some(connection),
            pool: None,
            _permit: None,
        }
    }

    /// The borrowed handle.
    pub fn connection(&self) -> &Arc<dyn Connection> {
        self.connection.as_ref().expect("connection taken")
    }
}

impl Deref for Lease {
    type Target = dyn Connection;

    fn deref(&self) -> &Self::Target {
        self.connection.as_ref().expect("connection taken").as_ref()
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        let Some(conn) = self.connection.take() else {
            return;
        };
        let Some(pool) = self.pool.take() else {
            return;
        };

        pool.checked_out.fetch_sub(1, Ordering::SeqCst);

        if pool.shut_down.load(Ordering::SeqCst) {
            // The pool is gone; dropping the last reference lets the
            // driver clean the handle up instead of re-pooling it.
            pool.live.fetch_sub(1, Ordering::SeqCst);
            if let Some(permit) = self._permit.take() {
                permit.forget();
            }
            tracing::debug!(
                driver = conn.driver_name(),
                "dropping connection released after pool shutdown"
            );
            return;
        }

        // Re-pool before the permit drops so a waiter always finds the
        // connection it was promised.
        pool.idle.lock().push_back(conn);
    }
}
