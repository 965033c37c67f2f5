//! JSON request dispatcher mounted at `/req`.
//!
//! Every reply has the shape `{"error": ..., "result": ...}` with HTTP 200;
//! failures are reported through the `error` code.

use crate::state::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub request: Option<String>,
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RequestResponse {
    pub error: Option<String>,
    pub result: Option<Value>,
}

impl RequestResponse {
    fn ok(result: Option<Value>) -> Self {
        Self {
            error: None,
            result,
        }
    }

    fn err(error: RequestError) -> Self {
        Self {
            error: Some(error.code().to_string()),
            result: None,
        }
    }
}

/// Failure codes understood by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestError {
    BadRequest,
    NoData,
    NoPath,
    BadPath,
    /// The parent folder of the target file does not exist.
    FolderExist,
    WriteFailed,
}

impl RequestError {
    pub fn code(self) -> &'static str {
        match self {
            RequestError::BadRequest => "badRequest",
            RequestError::NoData => "noData",
            RequestError::NoPath => "noPath",
            RequestError::BadPath => "badPath",
            RequestError::FolderExist => "folderExist",
            RequestError::WriteFailed => "writeFailed",
        }
    }
}

pub async fn dispatch(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RequestBody>,
) -> Json<RequestResponse> {
    let outcome = match body.request.as_deref() {
        Some("saveAssetData") => save_asset_data(&state.config.root_dir, &body.params).map(|()| None),
        other => {
            debug!(target: "devrelay::api", "Unknown request {:?}", other);
            Err(RequestError::BadRequest)
        }
    };

    Json(match outcome {
        Ok(result) => RequestResponse::ok(result),
        Err(e) => RequestResponse::err(e),
    })
}

/// Write `params.data` as JSON to `params.path` under `root`.
fn save_asset_data(root: &Path, params: &Map<String, Value>) -> Result<(), RequestError> {
    let data = match params.get("data") {
        None | Some(Value::Null) => return Err(RequestError::NoData),
        Some(data) => data,
    };
    let path = match params.get("path").and_then(Value::as_str) {
        Some(path) if !path.is_empty() => path,
        _ => return Err(RequestError::NoPath),
    };

    let relative = project_relative(path).ok_or(RequestError::BadPath)?;
    let target = root.join(&relative);

    let folder = target.parent().unwrap_or(root);
    if !folder.is_dir() {
        return Err(RequestError::FolderExist);
    }

    let json = serde_json::to_string(data).map_err(|_| RequestError::WriteFailed)?;
    std::fs::write(&target, json).map_err(|e| {
        warn!(target: "devrelay::api", "Failed to write {}: {}", target.display(), e);
        RequestError::WriteFailed
    })?;

    info!(target: "devrelay::api", "Saved asset data to {}", target.display());
    Ok(())
}

/// Resolve a client path against the project root. Leading slashes are
/// relative to the root; `..` and drive prefixes are rejected.
fn project_relative(path: &str) -> Option<PathBuf> {
    let mut relative = PathBuf::new();
    for component in Path::new(path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if relative.as_os_str().is_empty() {
        None
    } else {
        Some(relative)
    }
}
