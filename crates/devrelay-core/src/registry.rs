//! Registry of live connections.

use crate::{RelayError, Result};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use devrelay_types::{ConnectionId, ServerFrame};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::warn;

/// Server-side capability to push frames to one client.
///
/// Wraps the sending half of the connection's bounded outbound queue. The
/// writer task owned by the transport drains the other half into the socket.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    tx: mpsc::Sender<ServerFrame>,
    connected_at: DateTime<Utc>,
}

impl ConnectionHandle {
    pub fn new(tx: mpsc::Sender<ServerFrame>) -> Self {
        Self {
            tx,
            connected_at: Utc::now(),
        }
    }

    /// Create a handle together with the receiving end of its queue.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ServerFrame>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }

    /// Queue a frame without waiting. Fails if the queue is full or the
    /// writer has gone away.
    pub fn push(&self, frame: ServerFrame) -> Result<()> {
        self.tx.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => RelayError::QueueFull,
            TrySendError::Closed(_) => RelayError::QueueClosed,
        })
    }

    pub fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }

    /// Whether both handles feed the same outbound queue.
    pub fn same_channel(&self, other: &ConnectionHandle) -> bool {
        self.tx.same_channel(&other.tx)
    }
}

/// One registered client session.
#[derive(Debug, Clone)]
pub struct Connection {
    pub id: ConnectionId,
    pub handle: ConnectionHandle,
}

/// Maps connection ids to their handles.
///
/// Safe to share across connection tasks. Each operation is atomic on its
/// own; `all` returns an owned snapshot so callers never hold a shard lock
/// while delivering.
#[derive(Debug, Default)]
pub struct Registry {
    connections: DashMap<ConnectionId, Connection>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `id`.
    ///
    /// A replaced handle is dropped without notifying its holder. Returns it
    /// for callers that care.
    pub fn register(&self, id: ConnectionId, handle: ConnectionHandle) -> Option<ConnectionHandle> {
        let connection = Connection {
            id: id.clone(),
            handle,
        };
        let replaced = self.connections.insert(id, connection);
        if let Some(old) = &replaced {
            warn!(target: "devrelay::relay", "Connection id {} reused, replacing stale handle", old.id);
        }
        replaced.map(|old| old.handle)
    }

    /// Remove the entry for `id`. Removing an absent id is a no-op.
    pub fn unregister(&self, id: &ConnectionId) -> Option<ConnectionHandle> {
        self.connections.remove(id).map(|(_, connection)| connection.handle)
    }

    pub fn lookup(&self, id: &ConnectionId) -> Option<Connection> {
        self.connections.get(id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.connections.contains_key(id)
    }

    /// Snapshot of every registered connection, in no particular order.
    pub fn all(&self) -> Vec<Connection> {
        self.connections
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
