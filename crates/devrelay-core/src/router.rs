//! Broadcast and unicast routing over the registry.

use crate::{Registry, RelayError, Result};
use devrelay_types::{ClientEvent, ClientFrame, ConnectionId, Envelope, ServerFrame};
use std::sync::Arc;
use tracing::{debug, trace};

/// Outcome of one routing decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Recipients a push was attempted on.
    pub attempted: usize,
    /// Pushes that were accepted by the recipient's queue.
    pub delivered: usize,
}

impl Delivery {
    pub fn failed(&self) -> usize {
        self.attempted - self.delivered
    }
}

/// Decode a text frame received from a client.
pub fn decode_frame(text: &str) -> Result<ClientFrame> {
    Ok(serde_json::from_str(text)?)
}

/// Picks the recipients of each inbound message.
#[derive(Debug, Clone)]
pub struct Router {
    registry: Arc<Registry>,
}

impl Router {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Route a decoded client frame according to its event.
    pub fn route(&self, sender: &ConnectionId, frame: ClientFrame) -> Result<Delivery> {
        let (event, envelope) = frame.into_parts();
        match event {
            ClientEvent::Broadcast => Ok(self.broadcast(sender, envelope)),
            ClientEvent::Message => self.unicast(sender, envelope),
        }
    }

    /// Deliver `envelope` to every registered connection, sender included.
    pub fn broadcast(&self, sender: &ConnectionId, mut envelope: Envelope) -> Delivery {
        envelope.default_sender(sender);
        let delivery = self.fan_out(&ServerFrame::Message(envelope), None);
        trace!(
            target: "devrelay::relay",
            "Broadcast from {}: {}/{} delivered",
            sender,
            delivery.delivered,
            delivery.attempted
        );
        delivery
    }

    /// Deliver `envelope` to the connection named by its `to` field.
    pub fn unicast(&self, sender: &ConnectionId, mut envelope: Envelope) -> Result<Delivery> {
        let recipient = envelope
            .recipient()
            .cloned()
            .ok_or(RelayError::MissingRecipient)?;

        let connection = self
            .registry
            .lookup(&recipient)
            .ok_or_else(|| RelayError::UnknownRecipient(recipient.clone()))?;

        envelope.default_sender(sender);

        let mut delivery = Delivery {
            attempted: 1,
            delivered: 0,
        };
        match connection.handle.push(ServerFrame::Message(envelope)) {
            Ok(()) => delivery.delivered = 1,
            Err(e) => {
                debug!(target: "devrelay::relay", "Dropped message from {} to {}: {}", sender, recipient, e);
            }
        }
        Ok(delivery)
    }

    /// Push `frame` to every registered connection except `exclude`.
    ///
    /// Iterates a snapshot of the registry. A failed push is logged and the
    /// remaining recipients are still served.
    pub fn fan_out(&self, frame: &ServerFrame, exclude: Option<&ConnectionId>) -> Delivery {
        let mut delivery = Delivery::default();

        for connection in self.registry.all() {
            if exclude == Some(&connection.id) {
                continue;
            }
            delivery.attempted += 1;
            match connection.handle.push(frame.clone()) {
                Ok(()) => delivery.delivered += 1,
                Err(e) => {
                    debug!(target: "devrelay::relay", "Dropped frame for {}: {}", connection.id, e);
                }
            }
        }

        delivery
    }
}
