// File-backed Probe Log
//
// Line format: `<RFC3339 UTC timestamp> <event>`

use async_trait::async_trait;
use chrono::SecondsFormat;
use hypnos_core::error::Result;
use hypnos_core::port::{LogStore, ProbeLog, TimeProvider};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

/// Append-only log file owned by a single probe worker
pub struct FileProbeLog {
    path: PathBuf,
    file: Mutex<File>,
    time_provider: Arc<dyn TimeProvider>,
}

impl FileProbeLog {
    /// Open `path` for appending, creating it and its parent directory
    pub async fn open(path: &Path, time_provider: Arc<dyn TimeProvider>) -> Result<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;

        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
            time_provider,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ProbeLog for FileProbeLog {
    async fn append(&self, line: &str) -> Result<()> {
        let stamp = self
            .time_provider
            .now()
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        let entry = format!("{} {}\n", stamp, line);

        let mut file = self.file.lock().await;
        file.write_all(entry.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Opens and deletes probe logs on the local filesystem
pub struct FileLogStore {
    time_provider: Arc<dyn TimeProvider>,
}

impl FileLogStore {
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self { time_provider }
    }
}

#[async_trait]
impl LogStore for FileLogStore {
    async fn open(&self, path: &Path) -> Result<Arc<dyn ProbeLog>> {
        let log = FileProbeLog::open(path, self.time_provider.clone()).await?;
        debug!(path = %path.display(), "Probe log opened");
        Ok(Arc::new(log))
    }

    async fn remove(&self, path: &Path) -> Result<bool> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
