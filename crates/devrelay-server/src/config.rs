//! Server configuration.

use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Project root: static files are served from here and scaffolding
    /// and build output land here.
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,
    #[serde(default = "default_asset_dir")]
    pub asset_dir: String,
    #[serde(default = "default_script_dir")]
    pub script_dir: String,
    /// Bundle entry point, relative to `root_dir`.
    #[serde(default = "default_entry")]
    pub entry: PathBuf,
    /// Serve `/build/index.js` and `/build/data.json` freshly built on each request.
    #[serde(default = "default_true")]
    pub development_mode: bool,
    /// Create the project skeleton on startup.
    #[serde(default = "default_true")]
    pub init_project: bool,
    /// Frames queued per WebSocket client before new ones are dropped.
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,
    #[serde(default)]
    pub bundler: BundlerConfig,
}

/// External command used to build the client bundle.
///
/// Invoked as `command args... entry` from `root_dir`; the bundle is read
/// from stdout.
#[derive(Debug, Clone, Deserialize)]
pub struct BundlerConfig {
    #[serde(default = "default_bundler_command")]
    pub command: String,
    #[serde(default = "default_bundler_args")]
    pub args: Vec<String>,
}

impl Default for BundlerConfig {
    fn default() -> Self {
        Self {
            command: default_bundler_command(),
            args: default_bundler_args(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(3000)
}

fn default_root_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_asset_dir() -> String {
    "assets".to_string()
}

fn default_script_dir() -> String {
    "src".to_string()
}

fn default_entry() -> PathBuf {
    PathBuf::from("src/main.js")
}

fn default_true() -> bool {
    true
}

fn default_outbound_buffer() -> usize {
    64
}

fn default_bundler_command() -> String {
    "esbuild".to_string()
}

fn default_bundler_args() -> Vec<String> {
    vec!["--bundle".to_string(), "--format=iife".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            root_dir: default_root_dir(),
            asset_dir: default_asset_dir(),
            script_dir: default_script_dir(),
            entry: default_entry(),
            development_mode: true,
            init_project: true,
            outbound_buffer: default_outbound_buffer(),
            bundler: BundlerConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from default location (config/default.toml) or fall back to defaults.
    pub fn load() -> Result<Self> {
        let config_path = PathBuf::from("config/default.toml");
        if config_path.exists() {
            return Self::load_from(&config_path);
        }

        Ok(Config::default())
    }

    /// Directory holding the asset tree.
    pub fn asset_path(&self) -> PathBuf {
        self.root_dir.join(&self.asset_dir)
    }

    /// Directory build artifacts are saved to.
    pub fn build_path(&self) -> PathBuf {
        self.root_dir.join("build")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            port = 4000
            root_dir = "/tmp/game"

            [bundler]
            command = "browserify"
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 4000);
        assert_eq!(config.root_dir, PathBuf::from("/tmp/game"));
        assert_eq!(config.asset_dir, "assets");
        assert_eq!(config.entry, PathBuf::from("src/main.js"));
        assert!(config.development_mode);
        assert_eq!(config.outbound_buffer, 64);
        assert_eq!(config.bundler.command, "browserify");
        assert_eq!(config.bundler.args, vec!["--bundle", "--format=iife"]);
    }

    #[test]
    fn test_derived_paths() {
        let config = Config {
            root_dir: PathBuf::from("/srv/app"),
            asset_dir: "media".to_string(),
            ..Config::default()
        };
        assert_eq!(config.asset_path(), PathBuf::from("/srv/app/media"));
        assert_eq!(config.build_path(), PathBuf::from("/srv/app/build"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devrelay.toml");
        std::fs::write(&path, "development_mode = false\noutbound_buffer = 8\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(!config.development_mode);
        assert_eq!(config.outbound_buffer, 8);
    }
}
