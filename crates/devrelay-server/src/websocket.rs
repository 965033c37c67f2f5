//! WebSocket transport for the message relay.
//!
//! Each socket gets a reader task that decodes frames in arrival order and
//! hands them to the relay, and a writer task that drains the connection's
//! outbound queue into the socket.

use crate::state::AppState;
use anyhow::Result;
use axum::extract::ws::{Message, WebSocket};
use devrelay_core::{decode_frame, ConnectionHandle, Delivery, Relay, RelayEvent};
use devrelay_types::{ConnectionId, ServerFrame};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{debug, trace, warn};

pub async fn handle_websocket(socket: WebSocket, state: Arc<AppState>) -> Result<()> {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (handle, mut outbound_rx) = ConnectionHandle::channel(state.config.outbound_buffer);
    let id = ConnectionId::generate();

    // Queued before registering so it is always the first frame the client sees
    handle.push(ServerFrame::Welcome { id: id.clone() })?;
    state.relay.handle_event(RelayEvent::Connect {
        id: id.clone(),
        handle,
    });

    let writer_id = id.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            let json = match serde_json::to_string(&frame) {
                Ok(json) => json,
                Err(e) => {
                    warn!(target: "devrelay::ws", "Failed to encode frame for {}: {}", writer_id, e);
                    continue;
                }
            };
            if let Err(e) = ws_tx.send(Message::Text(json.into())).await {
                debug!(target: "devrelay::ws", "WebSocket send failed for {}: {}", writer_id, e);
                break;
            }
        }
    });

    let relay = state.relay.clone();
    let reader_id = id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = ws_rx.next().await {
            match msg {
                Message::Text(text) => {
                    handle_text(&relay, &reader_id, text.as_str());
                }
                Message::Binary(_) => {
                    debug!(target: "devrelay::ws", "Ignoring binary frame from {}", reader_id);
                }
                Message::Close(_) => {
                    debug!(target: "devrelay::ws", "Client {} closed connection", reader_id);
                    break;
                }
                // Pong is handled automatically by axum
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    state.relay.handle_event(RelayEvent::Disconnect { id });
    Ok(())
}

/// Decode one text frame from `sender` and route it.
///
/// Returns `None` when the frame could not be decoded; such frames are
/// dropped without telling the sender.
pub fn handle_text(relay: &Relay, sender: &ConnectionId, text: &str) -> Option<Delivery> {
    match decode_frame(text) {
        Ok(frame) => {
            trace!(target: "devrelay::ws", "{} -> {:?}", sender, frame.event);
            Some(relay.dispatch(sender, frame))
        }
        Err(e) => {
            debug!(target: "devrelay::ws", "Dropping frame from {}: {}", sender, e);
            None
        }
    }
}
