//! Connection registry, routing and lifecycle management for the devrelay message relay.

mod error;
mod lifecycle;
mod registry;
mod router;

pub use error::RelayError;
pub use lifecycle::{Relay, RelayEvent};
pub use registry::{Connection, ConnectionHandle, Registry};
pub use router::{decode_frame, Delivery, Router};

/// Result type for relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;
