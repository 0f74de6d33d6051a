// Probe Supervisor - launcher side of the probe lifecycle

pub mod schedule;

pub use schedule::{validate_request, ScheduleRequest};

use crate::domain::ProbeRecord;
use crate::error::Result;
use crate::port::{ProbeStore, TimeProvider, WorkerSpawner};
use std::path::PathBuf;
use std::sync::Arc;

/// Starts detached workers and registers them in the Metadata Store
pub struct ProbeSupervisor {
    store: Arc<dyn ProbeStore>,
    spawner: Arc<dyn WorkerSpawner>,
    time_provider: Arc<dyn TimeProvider>,
    log_dir: PathBuf,
}

impl ProbeSupervisor {
    pub fn new(
        store: Arc<dyn ProbeStore>,
        spawner: Arc<dyn WorkerSpawner>,
        time_provider: Arc<dyn TimeProvider>,
        log_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            spawner,
            time_provider,
            log_dir: log_dir.into(),
        }
    }

    /// Schedule a new probe
    pub async fn schedule(&self, req: ScheduleRequest) -> Result<ProbeRecord> {
        schedule::execute(
            self.store.as_ref(),
            self.spawner.as_ref(),
            self.time_provider.as_ref(),
            &self.log_dir,
            req,
        )
        .await
    }
}
