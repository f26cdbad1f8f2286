//! WebSocket endpoint
//!
//! Provides the `/ws` endpoint. Each socket is split into a reader loop that
//! feeds the `RelayHub` and a writer task that drains the socket's queue.

pub mod connection;
pub mod handler;

pub use connection::{ChannelConnection, ConnectionSender};
pub use handler::ws_handler;
