//! Hidden worker entrypoint: runs one probe's Downtime Engine to completion

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

use hypnos_core::application::{DowntimeEngine, EngineConfig};
use hypnos_core::domain::{ProbeDuration, RecurrencePolicy};
use hypnos_core::error::{AppError, Result};
use hypnos_core::port::time_provider::SystemTimeProvider;
use hypnos_core::port::LogStore;
use hypnos_infra_fs::FileLogStore;
use hypnos_infra_system::{DesktopNotifier, ShellScriptExecutor};

/// Arguments exactly as the launcher passes them
#[derive(Debug, Clone)]
pub struct WorkerArgs {
    pub probe: String,
    pub script: String,
    pub duration: String,
    pub iterations: u32,
    pub recurrent: bool,
    pub notify: bool,
    pub log_path: PathBuf,
}

impl WorkerArgs {
    fn engine_config(&self) -> Result<EngineConfig> {
        let duration: ProbeDuration = self
            .duration
            .parse()
            .map_err(|e: hypnos_core::domain::DomainError| {
                AppError::validation("duration", e.to_string())
            })?;

        Ok(EngineConfig {
            name: self.probe.clone(),
            script: self.script.clone(),
            duration,
            policy: RecurrencePolicy::new(self.recurrent, self.iterations),
            notify_only: self.notify,
        })
    }
}

pub async fn run(args: WorkerArgs) -> Result<ExitCode> {
    let config = args.engine_config()?;
    let logs = FileLogStore::new(Arc::new(SystemTimeProvider));
    let log = logs.open(&args.log_path).await?;

    info!(probe = %config.name, pid = std::process::id(), "Worker starting");
    let engine = DowntimeEngine::new(
        config,
        Arc::new(ShellScriptExecutor::default()),
        Arc::new(DesktopNotifier::default()),
        log,
    );
    let summary = engine.run().await?;

    info!(probe = %args.probe, cycles = summary.cycles, "Worker finished");
    Ok(ExitCode::SUCCESS)
}
