//! Connection lifecycle wiring
//!
//! `RelayHub` is the one broadcast hub of the process. It owns the registry
//! and the presence tracker and is shared with every connection handler
//! through an `Arc`.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::MissingUserPolicy;

use super::auditor::IdleAuditor;
use super::connection::{Connection, ConnectionId};
use super::events::Frame;
use super::presence::PresenceTracker;
use super::registry::ConnectionRegistry;
use super::router::EventRouter;

/// Point-in-time view of the hub, served by `/api/stats`
#[derive(Clone, Debug, Serialize)]
pub struct HubStats {
    pub connections: usize,
    pub typing_users: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub uptime_secs: i64,
}

pub struct RelayHub {
    registry: Arc<ConnectionRegistry>,
    presence: Arc<PresenceTracker>,
    router: EventRouter,
    started_at: DateTime<Utc>,
}

impl RelayHub {
    pub fn new(missing_user: MissingUserPolicy) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let presence = Arc::new(PresenceTracker::new());
        let router = EventRouter::new(registry.clone(), presence.clone(), missing_user);

        Self {
            registry,
            presence,
            router,
            started_at: Utc::now(),
        }
    }

    /// A freshly upgraded connection joins the relay
    pub fn on_open(&self, conn: Arc<dyn Connection>) {
        let id = conn.id();
        self.registry.add(conn);
        info!(connection = %id, connections = self.registry.len(), "New client connected");
    }

    pub fn on_message(&self, source: ConnectionId, frame: Frame) {
        self.router.handle_incoming(frame, source);
    }

    /// The transport reported `source` closed.
    ///
    /// Removes the connection, then clears and announces `typing_stop` for
    /// every typing user to the remaining connections. Safe to call more
    /// than once for the same id.
    pub fn on_close(&self, source: ConnectionId) {
        let removed = self.registry.remove(source);
        if removed {
            info!(connection = %source, connections = self.registry.len(), "Client disconnected");
        }

        let released = self.router.release_all_typing();
        if !released.is_empty() {
            info!(users = %released.join(", "), "Cleared typing indicators on disconnect");
        }
    }

    /// Build an auditor that watches this hub's presence tracker
    pub fn auditor(&self, period: Duration) -> IdleAuditor {
        IdleAuditor::new(self.presence.clone(), period)
    }

    pub fn presence(&self) -> &PresenceTracker {
        &self.presence
    }

    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }

    pub fn stats(&self) -> HubStats {
        let now = Utc::now();
        HubStats {
            connections: self.registry.len(),
            typing_users: self.presence.all_typing_users(),
            started_at: self.started_at,
            uptime_secs: (now - self.started_at).num_seconds(),
        }
    }
}

impl Default for RelayHub {
    fn default() -> Self {
        Self::new(MissingUserPolicy::default())
    }
}
