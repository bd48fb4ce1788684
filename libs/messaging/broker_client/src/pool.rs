//! Connection limiter for the publish pool
//!
//! reqwest keeps idle connections warm per host; this limiter bounds how many
//! are open at once. Every publish holds a permit for the duration of its HTTP
//! round trip, so in-flight requests (and therefore open HTTP/1 connections)
//! never exceed `max_connections`. Callers never lock anything themselves.

use crate::error::PublishError;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::{Semaphore, SemaphorePermit};

/// Statistics for pool monitoring
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Configured ceiling on concurrently open connections
    pub max_connections: usize,
    /// Connections currently checked out
    pub in_flight: usize,
    /// Highest concurrent checkout observed
    pub peak_in_flight: usize,
    /// Publish calls that succeeded
    pub published: u64,
    /// Publish calls that failed, any kind
    pub failed: u64,
    /// Failed calls that hit the deadline
    pub timeouts: u64,
}

#[derive(Debug)]
pub(crate) struct ConnectionLimiter {
    permits: Semaphore,
    max_connections: usize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    published: AtomicU64,
    failed: AtomicU64,
    timeouts: AtomicU64,
}

/// RAII checkout; dropping it returns the connection slot
pub(crate) struct ConnectionGuard<'a> {
    limiter: &'a ConnectionLimiter,
    _permit: SemaphorePermit<'a>,
}

impl ConnectionLimiter {
    pub(crate) fn new(max_connections: usize) -> Self {
        Self {
            permits: Semaphore::new(max_connections),
            max_connections,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            published: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            timeouts: AtomicU64::new(0),
        }
    }

    pub(crate) async fn acquire(&self, channel: &str) -> Result<ConnectionGuard<'_>, PublishError> {
        let permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| PublishError::Network {
                channel: channel.to_string(),
                message: "connection pool closed".to_string(),
            })?;

        let now = self.in_flight.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::AcqRel);

        Ok(ConnectionGuard {
            limiter: self,
            _permit: permit,
        })
    }

    pub(crate) fn record(&self, result: &Result<(), PublishError>) {
        match result {
            Ok(()) => {
                self.published.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                if e.is_timeout() {
                    self.timeouts.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
    }

    pub(crate) fn stats(&self) -> PoolStats {
        PoolStats {
            max_connections: self.max_connections,
            in_flight: self.in_flight.load(Ordering::Acquire),
            peak_in_flight: self.peak_in_flight.load(Ordering::Acquire),
            published: self.published.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
        }
    }
}

impl Drop for ConnectionGuard<'_> {
    fn drop(&mut self) {
        self.limiter.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}
