//! Typing Relay
//!
//! A realtime chat relay over WebSockets. Clients send chat messages and
//! typing-presence events; the server fans each one out to the other
//! connected clients.
//!
//! # Wire format
//!
//! - `{"type":"message", ...}` is re-serialized and sent to everyone, sender included
//! - `{"type":"typing_start","user":"..."}` marks the user typing and is sent to everyone else
//! - `{"type":"typing_stop","user":"..."}` clears the marker and is sent to everyone else
//! - anything else is relayed to everyone byte for byte
//!
//! When a client disconnects, every typing user is cleared and a
//! `typing_stop` is announced for each.
//!
//! # Modules
//!
//! - `relay`: Connection registry, presence tracker, router, lifecycle hub, auditor
//! - `api`: Axum router and the WebSocket endpoint
//! - `config`: Command line / environment configuration
//! - `server`: Process wiring and graceful shutdown
//!
//! # Example
//!
//! ```no_run
//! use typing_relay::{config::Config, server};
//!
//! #[tokio::main]
//! async fn main() -> typing_relay::RelayResult<()> {
//!     server::run(Config::default()).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod relay;
pub mod server;

// Re-export commonly used items at crate root
pub use config::{Config, MissingUserPolicy};
pub use error::{RelayError, RelayResult};
pub use relay::{
    ChatMessage, Connection, ConnectionId, ConnectionRegistry, EventRouter, Frame, HubStats,
    IdleAuditor, PresenceTracker, RelayEvent, RelayHub, TypingNotice,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
