//! Error types for the relay.

use devrelay_types::ConnectionId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("No client with id {0}")]
    UnknownRecipient(ConnectionId),

    #[error("Unicast message has no recipient")]
    MissingRecipient,

    #[error("Connection {0} is closed")]
    ConnectionClosed(ConnectionId),

    #[error("Malformed frame: {0}")]
    MalformedFrame(#[from] serde_json::Error),

    #[error("Outbound queue full")]
    QueueFull,

    #[error("Outbound queue closed")]
    QueueClosed,
}
