//! Live connection bookkeeping
//!
//! The only per-connection state is the connection's identity and when it
//! arrived; everything else about a connection is the transport's concern.

use crate::error::{BenchError, Result};
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

/// Tracks connected clients up to a fixed ceiling
pub struct ConnectionRegistry {
    connections: DashMap<Uuid, Instant>,
    active: AtomicUsize,
    max_connections: usize,
}

impl ConnectionRegistry {
    pub fn new(max_connections: usize) -> Self {
        Self {
            connections: DashMap::new(),
            active: AtomicUsize::new(0),
            max_connections,
        }
    }

    /// Register a new connection, failing when the ceiling is reached
    pub fn register(&self, id: Uuid) -> Result<()> {
        self.active
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.max_connections).then_some(n + 1)
            })
            .map_err(|_| BenchError::Connection {
                message: "Maximum connections reached".to_string(),
            })?;

        self.connections.insert(id, Instant::now());
        info!("Added connection {}, total connections: {}", id, self.count());
        Ok(())
    }

    /// Release a connection; returns false if it was already gone
    pub fn release(&self, id: Uuid) -> bool {
        match self.connections.remove(&id) {
            Some((_, connected_at)) => {
                self.active.fetch_sub(1, Ordering::AcqRel);
                info!(
                    "Removed connection {} after {:?}, total connections: {}",
                    id,
                    connected_at.elapsed(),
                    self.count()
                );
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.connections.contains_key(&id)
    }

    /// Get the number of connected clients
    pub fn count(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }
}
