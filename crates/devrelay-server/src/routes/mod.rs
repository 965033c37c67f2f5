//! HTTP route handlers.

pub mod build;
pub mod request;
pub mod ws;

use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub connections: usize,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        connections: state.relay.connection_count(),
    })
}

/// Build the application router.
///
/// Anything not matched by a route is served from the project root.
pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/api/health", get(health))
        .route("/ws", get(ws::upgrade))
        .route("/req", post(request::dispatch));

    if state.config.development_mode {
        app = app
            .route("/build/index.js", get(build::script))
            .route("/build/data.json", get(build::asset_data));
    }

    app.fallback_service(ServeDir::new(&state.config.root_dir))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
