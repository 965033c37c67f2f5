//! Project skeleton created on first start.

use crate::config::Config;
use std::io;
use std::path::Path;
use tracing::info;

const MAIN_JS: &str = include_str!("../templates/main.js");
const INDEX_HTML: &str = include_str!("../templates/index.html");
const STYLES_CSS: &str = include_str!("../templates/styles.css");

/// Create the project folders and starter files under `config.root_dir`.
///
/// Existing folders and files are left untouched.
pub fn init_project_files(config: &Config) -> io::Result<()> {
    let root = &config.root_dir;

    for folder in [config.asset_dir.as_str(), "audio", "build", config.script_dir.as_str()] {
        let path = root.join(folder);
        if !path.exists() {
            std::fs::create_dir_all(&path)?;
            info!(target: "devrelay::scaffold", "Created folder {}", path.display());
        }
    }

    let main_js = Path::new(&config.script_dir).join("main.js");
    create_file(root, &main_js, MAIN_JS)?;
    create_file(root, Path::new("index.html"), INDEX_HTML)?;
    create_file(root, Path::new("build/styles.css"), STYLES_CSS)?;

    Ok(())
}

fn create_file(root: &Path, dest: &Path, contents: &str) -> io::Result<()> {
    let path = root.join(dest);
    if path.exists() {
        return Ok(());
    }
    std::fs::write(&path, contents)?;
    info!(target: "devrelay::scaffold", "Created file {}", path.display());
    Ok(())
}
