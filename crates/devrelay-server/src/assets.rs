//! Asset tree served as `/build/data.json`.

use crate::config::Config;
use crate::error::ServerError;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{info, warn};

/// Walk the asset directory into a JSON tree.
///
/// Directories become objects keyed by entry name. `.json` files contribute
/// their parsed content, any other file its URL path. Keys drop the file
/// extension. Hidden entries are skipped, and a missing asset directory
/// yields an empty object.
pub fn collect_assets(config: &Config) -> Result<Value, ServerError> {
    let root = config.asset_path();
    if !root.is_dir() {
        return Ok(Value::Object(Map::new()));
    }
    let url_prefix = format!("/{}", config.asset_dir.trim_matches('/'));
    Ok(Value::Object(walk(&root, &url_prefix)?))
}

fn walk(dir: &Path, url_prefix: &str) -> Result<Map<String, Value>, ServerError> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?.flatten().collect();
    entries.sort_by_key(|entry| entry.file_name());

    let mut tree = Map::new();
    for entry in entries {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        let url = format!("{}/{}", url_prefix, name);

        if path.is_dir() {
            tree.insert(name.to_string(), Value::Object(walk(&path, &url)?));
            continue;
        }

        let key = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(name)
            .to_string();

        let value = if path.extension().is_some_and(|ext| ext == "json") {
            let content = std::fs::read_to_string(&path)?;
            match serde_json::from_str(&content) {
                Ok(value) => value,
                Err(e) => {
                    warn!(target: "devrelay::api", "Skipping invalid asset {}: {}", path.display(), e);
                    continue;
                }
            }
        } else {
            Value::String(url)
        };
        tree.insert(key, value);
    }

    Ok(tree)
}

/// Collect the asset tree and save it to `build/data.json`.
pub fn collect_and_save(config: &Config) -> Result<Value, ServerError> {
    let tree = collect_assets(config)?;
    let build = config.build_path();
    std::fs::create_dir_all(&build)?;
    std::fs::write(build.join("data.json"), serde_json::to_string(&tree)?)?;
    info!(target: "devrelay::api", "Saved asset data to {}", build.join("data.json").display());
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn config_for(dir: &TempDir) -> Config {
        Config {
            root_dir: dir.path().to_path_buf(),
            ..Config::default()
        }
    }

    #[test]
    fn test_missing_asset_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        assert_eq!(collect_assets(&config_for(&dir)).unwrap(), json!({}));
    }

    #[test]
    fn test_builds_nested_tree() {
        let dir = TempDir::new().unwrap();
        let assets = dir.path().join("assets");
        std::fs::create_dir_all(assets.join("sprites")).unwrap();
        std::fs::write(assets.join("sprites/hero.png"), [0u8; 4]).unwrap();
        std::fs::write(assets.join("level.json"), r#"{"width": 16}"#).unwrap();
        std::fs::write(assets.join("broken.json"), "{").unwrap();
        std::fs::write(assets.join(".DS_Store"), "").unwrap();

        let tree = collect_assets(&config_for(&dir)).unwrap();

        assert_eq!(
            tree,
            json!({
                "level": { "width": 16 },
                "sprites": { "hero": "/assets/sprites/hero.png" }
            })
        );
    }

    #[test]
    fn test_collect_and_save_writes_build_file() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets/a.txt"), "x").unwrap();

        let tree = collect_and_save(&config_for(&dir)).unwrap();

        let saved: Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("build/data.json")).unwrap())
                .unwrap();
        assert_eq!(saved, tree);
        assert_eq!(saved["a"], "/assets/a.txt");
    }
}
