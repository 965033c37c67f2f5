//! Shared wire types for the devrelay message relay.

mod connection;
mod envelope;
mod ws;

pub use connection::*;
pub use envelope::*;
pub use ws::*;
