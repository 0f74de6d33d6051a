// JSON ProbeStore Implementation

use async_trait::async_trait;
use hypnos_core::domain::ProbeRecord;
use hypnos_core::error::{AppError, Result};
use hypnos_core::port::ProbeStore;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

const RECORD_EXTENSION: &str = "json";
const TEMP_SUFFIX: &str = "tmp";

/// One pretty-printed JSON file per probe under the probe directory
pub struct JsonProbeStore {
    dir: PathBuf,
}

impl JsonProbeStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn record_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, RECORD_EXTENSION))
    }
}

// Helper to convert io errors on a record into AppError
fn map_io_error(err: std::io::Error, name: &str, path: &Path) -> AppError {
    match err.kind() {
        ErrorKind::NotFound => AppError::NotFound(format!("probe {:?}", name)),
        _ => AppError::Io(std::io::Error::new(
            err.kind(),
            format!("{}: {}", path.display(), err),
        )),
    }
}

#[async_trait]
impl ProbeStore for JsonProbeStore {
    async fn put(&self, record: &ProbeRecord) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let data = serde_json::to_vec_pretty(record)?;
        let path = self.record_path(&record.name);
        let tmp = path.with_extension(format!("{}.{}", RECORD_EXTENSION, TEMP_SUFFIX));

        // write-then-rename so readers never observe a half-written record
        tokio::fs::write(&tmp, &data)
            .await
            .map_err(|e| map_io_error(e, &record.name, &tmp))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| map_io_error(e, &record.name, &path))?;

        debug!(probe = %record.name, path = %path.display(), "Probe record written");
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<ProbeRecord> {
        let path = self.record_path(name);
        let data = tokio::fs::read(&path)
            .await
            .map_err(|e| map_io_error(e, name, &path))?;

        serde_json::from_slice(&data).map_err(|e| AppError::Corrupt {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        Ok(names)
    }

    async fn remove(&self, name: &str) -> Result<bool> {
        let path = self.record_path(name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(map_io_error(e, name, &path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hypnos_core::domain::ProbeDuration;

    fn record(name: &str) -> ProbeRecord {
        ProbeRecord {
            name: name.to_string(),
            group: "work".to_string(),
            script: "say done".to_string(),
            log_path: PathBuf::from(format!("/tmp/hypnos/log/{}.log", name)),
            duration: ProbeDuration::from_secs(120),
            recurrent: true,
            iterations: 2,
            pid: 31337,
            created_at: Utc.with_ymd_and_hms(2025, 2, 3, 4, 5, 6).unwrap(),
            notify_only: false,
        }
    }

    #[tokio::test]
    async fn test_put_creates_directory_and_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonProbeStore::new(tmp.path().join("probe"));

        store.put(&record("focus")).await.unwrap();

        assert!(tmp.path().join("probe/focus.json").is_file());
        assert_eq!(store.get("focus").await.unwrap(), record("focus"));
    }

    #[tokio::test]
    async fn test_file_uses_wire_field_names() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonProbeStore::new(tmp.path());
        store.put(&record("focus")).await.unwrap();

        let raw = std::fs::read_to_string(tmp.path().join("focus.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["probe"], "focus");
        assert_eq!(value["duration"], "2m");
        assert_eq!(value["quiescence"], "2025-02-03T04:05:06Z");
        assert_eq!(value["notify"], false);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonProbeStore::new(tmp.path());

        let err = tokio_test::assert_err!(store.get("ghost").await);
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_garbage_is_corrupt() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("broken.json"), "{ not json").unwrap();
        let store = JsonProbeStore::new(tmp.path());

        assert!(matches!(
            store.get("broken").await,
            Err(AppError::Corrupt { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_absent_directory_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonProbeStore::new(tmp.path().join("does-not-exist"));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_strips_extension_and_ignores_strays() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonProbeStore::new(tmp.path());
        store.put(&record("alpha")).await.unwrap();
        store.put(&record("beta")).await.unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "hi").unwrap();
        std::fs::write(tmp.path().join("gamma.json.tmp"), "{").unwrap();
        std::fs::create_dir(tmp.path().join("nested.json")).unwrap();

        let mut names = store.list().await.unwrap();
        names.sort();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonProbeStore::new(tmp.path());
        store.put(&record("focus")).await.unwrap();

        let mut updated = record("focus");
        updated.pid = 42;
        store.put(&updated).await.unwrap();

        assert_eq!(store.get("focus").await.unwrap().pid, 42);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonProbeStore::new(tmp.path());
        store.put(&record("focus")).await.unwrap();

        assert!(store.remove("focus").await.unwrap());
        assert!(!store.remove("focus").await.unwrap());
        assert!(matches!(
            store.get("focus").await,
            Err(AppError::NotFound(_))
        ));
    }
}
