// Probe Log Port
//
// Each probe owns one append-only, human-readable event log. Only the probe's
// worker appends to it; the terminator deletes it.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use crate::error::Result;

#[async_trait]
pub trait ProbeLog: Send + Sync {
    /// Append one event line
    async fn append(&self, line: &str) -> Result<()>;
}

#[async_trait]
pub trait LogStore: Send + Sync {
    /// Open (creating if needed) the log at `path` for appending
    async fn open(&self, path: &Path) -> Result<Arc<dyn ProbeLog>>;

    /// Delete the log at `path`, returning whether it existed
    async fn remove(&self, path: &Path) -> Result<bool>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Log that keeps every line in memory
    #[derive(Default)]
    pub struct RecordingProbeLog {
        lines: Mutex<Vec<String>>,
    }

    impl RecordingProbeLog {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }

        pub fn count_containing(&self, needle: &str) -> usize {
            self.lines
                .lock()
                .unwrap()
                .iter()
                .filter(|l| l.contains(needle))
                .count()
        }
    }

    #[async_trait]
    impl ProbeLog for RecordingProbeLog {
        async fn append(&self, line: &str) -> Result<()> {
            self.lines.lock().unwrap().push(line.to_string());
            Ok(())
        }
    }

    /// Log store tracking which paths exist
    #[derive(Default)]
    pub struct InMemoryLogStore {
        existing: Mutex<HashSet<PathBuf>>,
        fail_removes: Mutex<bool>,
    }

    impl InMemoryLogStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn touch(&self, path: impl Into<PathBuf>) {
            self.existing.lock().unwrap().insert(path.into());
        }

        pub fn exists(&self, path: &Path) -> bool {
            self.existing.lock().unwrap().contains(path)
        }

        pub fn set_fail_removes(&self, fail: bool) {
            *self.fail_removes.lock().unwrap() = fail;
        }
    }

    #[async_trait]
    impl LogStore for InMemoryLogStore {
        async fn open(&self, path: &Path) -> Result<Arc<dyn ProbeLog>> {
            self.touch(path);
            Ok(Arc::new(RecordingProbeLog::new()))
        }

        async fn remove(&self, path: &Path) -> Result<bool> {
            if *self.fail_removes.lock().unwrap() {
                return Err(AppError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "mock log removal failure",
                )));
            }
            Ok(self.existing.lock().unwrap().remove(path))
        }
    }
}
