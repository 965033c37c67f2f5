//! Shared application state.

use crate::config::Config;
use devrelay_core::Relay;

/// Shared application state.
pub struct AppState {
    pub relay: Relay,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            relay: Relay::new(),
            config,
        }
    }
}
