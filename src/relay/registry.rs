//! Connection registry

use std::sync::Arc;

use parking_lot::RwLock;

use super::connection::{Connection, ConnectionId};

/// The set of currently open connections, in insertion order.
///
/// Iteration works on a snapshot of the handles: the lock is released before
/// any callback runs, so a callback may add or remove connections freely.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: RwLock<Vec<Arc<dyn Connection>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection. Adding the same id twice is a no-op.
    pub fn add(&self, conn: Arc<dyn Connection>) {
        let mut connections = self.connections.write();
        if connections.iter().all(|c| c.id() != conn.id()) {
            connections.push(conn);
        }
    }

    /// Remove a connection; returns false if it was not registered
    pub fn remove(&self, id: ConnectionId) -> bool {
        let mut connections = self.connections.write();
        let before = connections.len();
        connections.retain(|c| c.id() != id);
        connections.len() != before
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.connections.read().iter().any(|c| c.id() == id)
    }

    pub fn len(&self) -> usize {
        self.connections.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.read().is_empty()
    }

    /// Visit every connection that still reports open
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&dyn Connection),
    {
        for conn in self.snapshot() {
            if conn.is_open() {
                f(conn.as_ref());
            }
        }
    }

    /// Visit every open connection except `excluded`
    pub fn for_each_except<F>(&self, excluded: ConnectionId, mut f: F)
    where
        F: FnMut(&dyn Connection),
    {
        for conn in self.snapshot() {
            if conn.id() != excluded && conn.is_open() {
                f(conn.as_ref());
            }
        }
    }

    fn snapshot(&self) -> Vec<Arc<dyn Connection>> {
        self.connections.read().clone()
    }
}
