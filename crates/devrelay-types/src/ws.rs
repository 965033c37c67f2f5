//! WebSocket frame protocol between clients and the relay.
//!
//! Every frame is a JSON text message of the form `{"event": ..., "data": ...}`.

use serde::{Deserialize, Serialize};

use crate::{ConnectionId, Envelope};

/// Events a client may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientEvent {
    /// Deliver to every connected client, sender included.
    Broadcast,
    /// Deliver to the single client named by `to`.
    Message,
}

/// A frame sent from client to server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientFrame {
    pub event: ClientEvent,
    /// A missing or null payload is treated as an empty envelope.
    #[serde(default)]
    pub data: Option<Envelope>,
}

impl ClientFrame {
    pub fn new(event: ClientEvent, data: Envelope) -> Self {
        Self {
            event,
            data: Some(data),
        }
    }

    /// Split into the event and its envelope.
    pub fn into_parts(self) -> (ClientEvent, Envelope) {
        (self.event, self.data.unwrap_or_default())
    }
}

/// A frame sent from server to client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerFrame {
    /// Sent once right after connect so the client learns its own id.
    Welcome { id: ConnectionId },
    /// A relayed broadcast or unicast message.
    Message(Envelope),
    /// Another client went away.
    Disconnection { from: ConnectionId },
}
