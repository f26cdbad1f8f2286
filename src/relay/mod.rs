//! Relay core: connection registry, typing presence, event routing
//!
//! The core is transport-agnostic. It consumes `Connection` handles (send a
//! frame, report whether still open) and `Frame`s; the `api` module adapts
//! axum WebSockets to that shape.
//!
//! ## Flow
//! inbound frame -> `EventRouter` parses -> `PresenceTracker` updated for typing
//! events -> `ConnectionRegistry` iterated to deliver outbound frames. On close,
//! `RelayHub` asks the router to announce `typing_stop` for every typing user.

pub mod auditor;
pub mod connection;
pub mod events;
pub mod hub;
pub mod presence;
pub mod registry;
pub mod router;

pub use auditor::IdleAuditor;
pub use connection::{Connection, ConnectionId};
pub use events::{ChatMessage, Frame, RelayEvent, TypingNotice};
pub use hub::{HubStats, RelayHub};
pub use presence::PresenceTracker;
pub use registry::ConnectionRegistry;
pub use router::EventRouter;
