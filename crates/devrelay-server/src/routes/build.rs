//! Development-mode build routes.

use crate::assets;
use crate::bundle::Bundler;
use crate::error::ServerError;
use crate::state::AppState;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::sync::Arc;

/// Rebuild and serve the client bundle.
pub async fn script(State(state): State<Arc<AppState>>) -> Result<Response, ServerError> {
    let bundle = Bundler::from_config(&state.config).bundle_and_save().await?;
    Ok(([(header::CONTENT_TYPE, "application/javascript")], bundle).into_response())
}

/// Rebuild and serve the asset tree.
pub async fn asset_data(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ServerError> {
    Ok(Json(assets::collect_and_save(&state.config)?))
}
