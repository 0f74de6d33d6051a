// Probe Terminator
//
// Signals a worker and deletes its artifacts. Cleanup is best effort, not
// transactional: a failed log deletion does not restore the metadata record.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::port::{LogStore, ProcessSignaller, ProcessState, ProbeStore, SignalDelivery};

/// What happened to a probe's log file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogCleanup {
    Removed,
    Missing,
    Failed(String),
    /// Stasis leaves the log in place
    Kept,
}

/// How much of a stopped probe is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationMode {
    /// Record and log
    Purge,
    /// Record only; the log stays for later reading
    Stasis,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationOutcome {
    pub name: String,
    pub pid: i32,
    pub delivery: SignalDelivery,
    pub log_path: PathBuf,
    pub log_cleanup: LogCleanup,
}

/// Per-probe results of a batch termination
#[derive(Debug, Default)]
pub struct BatchTermination {
    pub results: Vec<(String, Result<TerminationOutcome>)>,
    /// Records that could not be read while matching a group
    pub skipped: Vec<(String, String)>,
}

impl BatchTermination {
    pub fn failures(&self) -> usize {
        self.results.iter().filter(|(_, r)| r.is_err()).count()
    }

    /// True when at least one probe was targeted and none failed
    pub fn is_success(&self) -> bool {
        !self.results.is_empty() && self.failures() == 0
    }
}

pub struct ProbeTerminator {
    store: Arc<dyn ProbeStore>,
    signaller: Arc<dyn ProcessSignaller>,
    logs: Arc<dyn LogStore>,
}

impl ProbeTerminator {
    pub fn new(
        store: Arc<dyn ProbeStore>,
        signaller: Arc<dyn ProcessSignaller>,
        logs: Arc<dyn LogStore>,
    ) -> Self {
        Self {
            store,
            signaller,
            logs,
        }
    }

    /// Terminate one probe, deleting its record and log
    ///
    /// # Errors
    /// - AppError::NotFound / AppError::Corrupt if the record cannot be loaded
    /// - AppError::Signal if the worker could not be signalled; nothing is deleted
    /// - AppError::Io if the metadata record could not be deleted
    pub async fn terminate(&self, name: &str) -> Result<TerminationOutcome> {
        self.stop(name, TerminationMode::Purge).await
    }

    /// Stop one probe and delete its record, keeping the log
    ///
    /// # Errors
    /// Same as [`ProbeTerminator::terminate`]
    pub async fn stasis(&self, name: &str) -> Result<TerminationOutcome> {
        self.stop(name, TerminationMode::Stasis).await
    }

    /// Put each named probe in stasis, continuing past individual failures
    pub async fn stasis_each(&self, names: &[String]) -> BatchTermination {
        self.stop_each(names.to_vec(), Vec::new(), TerminationMode::Stasis)
            .await
    }

    async fn stop(&self, name: &str, mode: TerminationMode) -> Result<TerminationOutcome> {
        let record = self.store.get(name).await?;

        let delivery = self.signal(record.pid).await?;
        match delivery {
            SignalDelivery::Delivered => {
                info!(probe = %name, pid = %record.pid, "Sent SIGTERM to worker")
            }
            SignalDelivery::AlreadyGone => {
                warn!(probe = %name, pid = %record.pid, "Worker was not running")
            }
        }

        self.store.remove(name).await?;

        let log_cleanup = match mode {
            TerminationMode::Stasis => LogCleanup::Kept,
            TerminationMode::Purge => match self.logs.remove(&record.log_path).await {
                Ok(true) => LogCleanup::Removed,
                Ok(false) => LogCleanup::Missing,
                Err(e) => {
                    warn!(
                        probe = %name,
                        log_path = %record.log_path.display(),
                        error = %e,
                        "Failed to remove probe log"
                    );
                    LogCleanup::Failed(e.to_string())
                }
            },
        };

        Ok(TerminationOutcome {
            name: record.name,
            pid: record.pid,
            delivery,
            log_path: record.log_path,
            log_cleanup,
        })
    }

    /// A finished but unreaped worker still answers signals; it counts as gone
    async fn signal(&self, pid: i32) -> Result<SignalDelivery> {
        if self.signaller.process_state(pid) == ProcessState::Defunct {
            debug!(pid = %pid, "Worker is defunct, not signalling");
            return Ok(SignalDelivery::AlreadyGone);
        }
        self.signaller.terminate(pid).await
    }

    /// Terminate every stored probe, continuing past individual failures
    pub async fn terminate_all(&self) -> Result<BatchTermination> {
        let mut names = self.store.list().await?;
        names.sort();
        Ok(self
            .stop_each(names, Vec::new(), TerminationMode::Purge)
            .await)
    }

    /// Terminate every probe whose record carries `group`
    ///
    /// Unreadable records cannot be matched and are reported as skipped.
    pub async fn terminate_group(&self, group: &str) -> Result<BatchTermination> {
        let mut names = self.store.list().await?;
        names.sort();

        let mut matched = Vec::new();
        let mut skipped = Vec::new();
        for name in names {
            match self.store.get(&name).await {
                Ok(record) if record.group == group => matched.push(name),
                Ok(_) => {}
                Err(e) => {
                    warn!(probe = %name, error = %e, "Skipping unreadable probe record");
                    skipped.push((name, e.to_string()));
                }
            }
        }

        if matched.is_empty() {
            return Err(AppError::NotFound(format!("no probes in group {:?}", group)));
        }
        Ok(self
            .stop_each(matched, skipped, TerminationMode::Purge)
            .await)
    }

    async fn stop_each(
        &self,
        names: Vec<String>,
        skipped: Vec<(String, String)>,
        mode: TerminationMode,
    ) -> BatchTermination {
        let mut batch = BatchTermination {
            results: Vec::with_capacity(names.len()),
            skipped,
        };
        for name in names {
            let result = self.stop(&name, mode).await;
            if let Err(e) = &result {
                warn!(probe = %name, error = %e, "Termination failed, continuing");
            }
            batch.results.push((name, result));
        }
        batch
    }
}
