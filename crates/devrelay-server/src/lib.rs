//! devrelay server library - HTTP/WebSocket development server with a message relay.
//!
//! Routes, the WebSocket transport and the build collaborators live here so
//! integration tests can drive them without a running binary.

pub mod assets;
pub mod bundle;
pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod scaffold;
pub mod state;
pub mod websocket;
