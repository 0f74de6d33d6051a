// On-disk layout
//
// <root>/config/*.toml   workflow presets
// <root>/log/<name>.log  one append-only log per probe
// <root>/probe/<name>.json one record per probe

use std::path::{Path, PathBuf};
use tracing::debug;

/// Directories every command works against, resolved once per invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HypnosDirs {
    pub root: PathBuf,
    pub config: PathBuf,
    pub log: PathBuf,
    pub probe: PathBuf,
}

impl HypnosDirs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            config: root.join("config"),
            log: root.join("log"),
            probe: root.join("probe"),
            root,
        }
    }

    /// Create every directory of the layout (idempotent)
    pub async fn ensure(&self) -> std::io::Result<()> {
        for dir in self.all() {
            tokio::fs::create_dir_all(dir).await?;
            debug!(dir = %dir.display(), "Ensured directory");
        }
        Ok(())
    }

    pub fn all(&self) -> [&Path; 4] {
        [
            self.root.as_path(),
            self.config.as_path(),
            self.log.as_path(),
            self.probe.as_path(),
        ]
    }
}
