//! Errors raised by the development-server collaborators.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to start bundler '{command}': {source}")]
    BundlerSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Bundler exited with {status}: {stderr}")]
    BundlerFailed { status: String, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        error!(target: "devrelay::api", "{}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
