//! Error types for the relay

use thiserror::Error;

use crate::relay::ConnectionId;

/// Errors raised by the relay
///
/// Only startup failures escape to `main`. Errors on the event path
/// (a send to a connection that just closed) are logged and dropped.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The recipient's transport no longer accepts writes
    #[error("connection {0} is closed")]
    ConnectionClosed(ConnectionId),

    /// The listener could not be bound
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The tracing subscriber could not be installed
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

/// Result type for relay operations
pub type RelayResult<T> = Result<T, RelayError>;
