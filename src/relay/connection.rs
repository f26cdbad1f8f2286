//! Abstract connection capability consumed by the relay core

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::RelayResult;

use super::events::Frame;

/// Process-unique connection counter
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one open channel, used for sender exclusion
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Allocate a fresh identifier
    pub fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One open channel to a client.
///
/// The transport owns the open/closed status; the relay only observes it.
/// `send` must never block: implementations queue the frame and return.
pub trait Connection: Send + Sync {
    fn id(&self) -> ConnectionId;

    /// Whether the transport still accepts writes
    fn is_open(&self) -> bool;

    /// Queue a frame for delivery. Fails with `ConnectionClosed` when the
    /// transport went away between the open check and the send.
    fn send(&self, frame: Frame) -> RelayResult<()>;
}
