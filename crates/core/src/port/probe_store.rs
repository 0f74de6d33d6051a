// Metadata Store Port
//
// One durable record per probe, keyed by name. There is no locking: the last
// `put` for a name wins and concurrent removals are tolerated.

use async_trait::async_trait;

use crate::domain::ProbeRecord;
use crate::error::Result;

#[async_trait]
pub trait ProbeStore: Send + Sync {
    /// Write (or overwrite) the record for `record.name`
    ///
    /// # Errors
    /// - AppError::Io if the directory or file cannot be written
    async fn put(&self, record: &ProbeRecord) -> Result<()>;

    /// Load the record for `name`
    ///
    /// # Errors
    /// - AppError::NotFound if no record exists
    /// - AppError::Corrupt if the stored content cannot be decoded
    async fn get(&self, name: &str) -> Result<ProbeRecord>;

    /// Names of every stored record; empty when the store does not exist yet
    async fn list(&self) -> Result<Vec<String>>;

    /// Delete the record for `name`, returning whether it existed
    async fn remove(&self, name: &str) -> Result<bool>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    enum Entry {
        Valid(ProbeRecord),
        Corrupt(String),
    }

    /// In-memory store, listing in name order
    #[derive(Default)]
    pub struct InMemoryProbeStore {
        entries: Mutex<BTreeMap<String, Entry>>,
        fail_puts: Mutex<bool>,
        fail_removes: Mutex<bool>,
    }

    impl InMemoryProbeStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Plant an undecodable entry under `name`
        pub fn insert_corrupt(&self, name: impl Into<String>, reason: impl Into<String>) {
            self.entries
                .lock()
                .unwrap()
                .insert(name.into(), Entry::Corrupt(reason.into()));
        }

        pub fn set_fail_puts(&self, fail: bool) {
            *self.fail_puts.lock().unwrap() = fail;
        }

        pub fn set_fail_removes(&self, fail: bool) {
            *self.fail_removes.lock().unwrap() = fail;
        }

        pub fn len(&self) -> usize {
            self.entries.lock().unwrap().len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    #[async_trait]
    impl ProbeStore for InMemoryProbeStore {
        async fn put(&self, record: &ProbeRecord) -> Result<()> {
            if *self.fail_puts.lock().unwrap() {
                return Err(AppError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "mock put failure",
                )));
            }
            self.entries
                .lock()
                .unwrap()
                .insert(record.name.clone(), Entry::Valid(record.clone()));
            Ok(())
        }

        async fn get(&self, name: &str) -> Result<ProbeRecord> {
            match self.entries.lock().unwrap().get(name) {
                Some(Entry::Valid(record)) => Ok(record.clone()),
                Some(Entry::Corrupt(reason)) => Err(AppError::Corrupt {
                    name: name.to_string(),
                    reason: reason.clone(),
                }),
                None => Err(AppError::NotFound(format!("probe {:?}", name))),
            }
        }

        async fn list(&self) -> Result<Vec<String>> {
            Ok(self.entries.lock().unwrap().keys().cloned().collect())
        }

        async fn remove(&self, name: &str) -> Result<bool> {
            if *self.fail_removes.lock().unwrap() {
                return Err(AppError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "mock remove failure",
                )));
            }
            Ok(self.entries.lock().unwrap().remove(name).is_some())
        }
    }
}
