//! WebSocket connection handler

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use super::connection::ChannelConnection;
use crate::relay::{Connection, Frame, RelayHub};

/// How long the writer may take to flush the close reply
const CLOSE_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(hub): State<Arc<RelayHub>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, hub))
}

/// Drive one WebSocket until it closes
async fn handle_socket(socket: WebSocket, hub: Arc<RelayHub>) {
    let (sink, mut stream) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel::<Message>();

    let closer = tx.clone();
    let connection = Arc::new(ChannelConnection::new(tx));
    let id = connection.id();
    hub.on_open(connection);

    let mut writer = tokio::spawn(writer_task(sink, rx));
    let mut close_frame = None;

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => hub.on_message(id, Frame::Text(text)),
            Ok(Message::Binary(data)) => hub.on_message(id, Frame::Binary(data)),
            // axum answers pings itself
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Ok(Message::Close(frame)) => {
                tracing::debug!(connection = %id, reason = ?frame, "Client initiated close");
                close_frame = frame;
                break;
            }
            Err(e) => {
                tracing::warn!(connection = %id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    hub.on_close(id);

    // Queue the close reply behind any pending frames, then let the writer finish
    let _ = closer.send(Message::Close(close_frame));
    drop(closer);
    if tokio::time::timeout(CLOSE_FLUSH_TIMEOUT, &mut writer)
        .await
        .is_err()
    {
        tracing::debug!(connection = %id, "Writer did not flush close in time");
        writer.abort();
    }
}

/// Forward queued frames to the socket until a close frame is written or
/// every sender is gone, then close the sink.
async fn writer_task(
    mut sink: SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<Message>,
) {
    while let Some(msg) = rx.recv().await {
        let closing = matches!(msg, Message::Close(_));
        if sink.send(msg).await.is_err() {
            return;
        }
        if closing {
            break;
        }
    }
    let _ = sink.close().await;
}
