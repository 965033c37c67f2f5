//! On-demand client bundle built by an external bundler.

use crate::config::Config;
use crate::error::ServerError;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, info};

/// Runs the configured bundler over the entry script.
#[derive(Debug, Clone)]
pub struct Bundler {
    command: String,
    args: Vec<String>,
    root_dir: PathBuf,
    entry: PathBuf,
    output: PathBuf,
}

impl Bundler {
    pub fn from_config(config: &Config) -> Self {
        Self {
            command: config.bundler.command.clone(),
            args: config.bundler.args.clone(),
            root_dir: config.root_dir.clone(),
            entry: config.entry.clone(),
            output: config.build_path().join("index.js"),
        }
    }

    /// Build the bundle and return its bytes.
    pub async fn bundle(&self) -> Result<Vec<u8>, ServerError> {
        debug!(target: "devrelay::bundle", "Running {} {:?} {}", self.command, self.args, self.entry.display());

        let output = Command::new(&self.command)
            .args(&self.args)
            .arg(&self.entry)
            .current_dir(&self.root_dir)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ServerError::BundlerSpawn {
                command: self.command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ServerError::BundlerFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }

    /// Build the bundle and keep a copy on disk next to the other build artifacts.
    pub async fn bundle_and_save(&self) -> Result<Vec<u8>, ServerError> {
        let bundle = self.bundle().await?;
        if let Some(parent) = self.output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.output, &bundle).await?;
        info!(target: "devrelay::bundle", "Built {} ({} bytes)", self.output.display(), bundle.len());
        Ok(bundle)
    }
}
