//! Channel-backed connection handle for an axum WebSocket

use axum::extract::ws::Message;
use tokio::sync::mpsc;

use crate::error::{RelayError, RelayResult};
use crate::relay::{Connection, ConnectionId, Frame};

/// Sender half of a socket's outbound queue
pub type ConnectionSender = mpsc::UnboundedSender<Message>;

/// A WebSocket as seen by the relay.
///
/// Frames are pushed onto an unbounded queue drained by the socket's writer
/// task, so sending never waits on the network. The connection reports
/// closed once the writer task has dropped the receiving half.
pub struct ChannelConnection {
    id: ConnectionId,
    tx: ConnectionSender,
}

impl ChannelConnection {
    pub fn new(tx: ConnectionSender) -> Self {
        Self {
            id: ConnectionId::next(),
            tx,
        }
    }
}

impl Connection for ChannelConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }

    fn send(&self, frame: Frame) -> RelayResult<()> {
        self.tx
            .send(frame.into())
            .map_err(|_| RelayError::ConnectionClosed(self.id))
    }
}

impl From<Frame> for Message {
    fn from(frame: Frame) -> Self {
        match frame {
            Frame::Text(text) => Message::Text(text),
            Frame::Binary(data) => Message::Binary(data),
        }
    }
}
