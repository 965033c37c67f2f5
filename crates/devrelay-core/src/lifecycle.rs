//! Connection lifecycle: accept, dispatch and disconnect.

use crate::{ConnectionHandle, Delivery, Registry, RelayError, Result, Router};
use chrono::Utc;
use devrelay_types::{ClientFrame, ConnectionId, ServerFrame};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Transport events fed into the relay by a connection task.
#[derive(Debug)]
pub enum RelayEvent {
    /// A connection was accepted and is ready to receive frames.
    Connect {
        id: ConnectionId,
        handle: ConnectionHandle,
    },
    /// A decoded frame arrived from `from`.
    Inbound { from: ConnectionId, frame: ClientFrame },
    /// The transport reported the connection closed.
    Disconnect { id: ConnectionId },
}

/// The message relay: owns the registry and routes between connections.
///
/// Cheap to clone; clones share the same registry.
#[derive(Debug, Clone)]
pub struct Relay {
    registry: Arc<Registry>,
    router: Router,
}

impl Default for Relay {
    fn default() -> Self {
        Self::new()
    }
}

impl Relay {
    pub fn new() -> Self {
        Self::with_registry(Arc::new(Registry::new()))
    }

    pub fn with_registry(registry: Arc<Registry>) -> Self {
        let router = Router::new(registry.clone());
        Self { registry, router }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }

    /// Register a new connection under a freshly generated id.
    pub fn accept(&self, handle: ConnectionHandle) -> ConnectionId {
        let id = ConnectionId::generate();
        self.accept_with_id(id.clone(), handle);
        id
    }

    /// Register a connection under an id chosen by the transport.
    pub fn accept_with_id(&self, id: ConnectionId, handle: ConnectionHandle) {
        self.registry.register(id.clone(), handle);
        info!(
            target: "devrelay::relay",
            "Client {} connected ({} connected)",
            id,
            self.registry.len()
        );
    }

    /// Route a frame from `sender`. Never fails: every relay error is
    /// logged here and dropped.
    pub fn dispatch(&self, sender: &ConnectionId, frame: ClientFrame) -> Delivery {
        match self.try_dispatch(sender, frame) {
            Ok(delivery) => delivery,
            Err(RelayError::UnknownRecipient(to)) => {
                debug!(target: "devrelay::relay", "No client with id {}", to);
                Delivery::default()
            }
            Err(e) => {
                debug!(target: "devrelay::relay", "Dropped frame from {}: {}", sender, e);
                Delivery::default()
            }
        }
    }

    fn try_dispatch(&self, sender: &ConnectionId, frame: ClientFrame) -> Result<Delivery> {
        if !self.registry.contains(sender) {
            return Err(RelayError::ConnectionClosed(sender.clone()));
        }
        self.router.route(sender, frame)
    }

    /// Remove `id` and tell every remaining connection it went away.
    ///
    /// Returns `None` when `id` was not registered, in which case nobody is
    /// notified. Connections registered while the notification is in flight
    /// may or may not receive it.
    pub fn disconnect(&self, id: &ConnectionId) -> Option<Delivery> {
        let Some(handle) = self.registry.unregister(id) else {
            debug!(target: "devrelay::relay", "Ignoring disconnect for unknown client {}", id);
            return None;
        };

        let lifetime = Utc::now() - handle.connected_at();
        info!(
            target: "devrelay::relay",
            "Client {} disconnected after {}s ({} remaining)",
            id,
            lifetime.num_seconds(),
            self.registry.len()
        );

        let delivery = self
            .router
            .fan_out(&ServerFrame::Disconnection { from: id.clone() }, Some(id));
        if delivery.failed() > 0 {
            warn!(
                target: "devrelay::relay",
                "Disconnect notice for {} missed {} of {} clients",
                id,
                delivery.failed(),
                delivery.attempted
            );
        }
        Some(delivery)
    }

    /// Apply one transport event.
    pub fn handle_event(&self, event: RelayEvent) {
        match event {
            RelayEvent::Connect { id, handle } => self.accept_with_id(id, handle),
            RelayEvent::Inbound { from, frame } => {
                self.dispatch(&from, frame);
            }
            RelayEvent::Disconnect { id } => {
                self.disconnect(&id);
            }
        }
    }
}
