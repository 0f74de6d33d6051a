// Schedule Use Case

use chrono::SubsecRound;
use std::path::Path;
use tracing::{error, info};

use crate::application::constants::LOG_EXTENSION;
use crate::domain::probe::validate_probe_name;
use crate::domain::{ProbeDuration, ProbeRecord, RecurrencePolicy};
use crate::error::{AppError, Result};
use crate::port::{ProbeStore, TimeProvider, WorkerLaunch, WorkerSpawner};

/// Fully-resolved probe request (presets and defaults already applied)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleRequest {
    pub name: String,
    pub group: String,
    pub script: String,
    pub duration: String,
    pub recurrent: bool,
    pub iterations: u32,
    pub notify_only: bool,
    /// Log file basename without extension; defaults to the probe name
    pub log_basename: Option<String>,
}

/// Reject a request before anything is spawned
///
/// # Returns
/// The parsed wait interval
pub fn validate_request(req: &ScheduleRequest) -> Result<ProbeDuration> {
    if req.name.is_empty() {
        return Err(AppError::validation("probe", "is required"));
    }
    validate_probe_name(&req.name)
        .map_err(|e| AppError::validation("probe", format!("is not a valid file name ({})", e)))?;

    if req.duration.trim().is_empty() {
        return Err(AppError::validation("duration", "is required"));
    }
    let duration: ProbeDuration = req
        .duration
        .parse()
        .map_err(|e: crate::domain::DomainError| AppError::validation("duration", e.to_string()))?;
    if duration.is_zero() {
        return Err(AppError::validation("duration", "must be greater than zero"));
    }

    if req.script.trim().is_empty() && !req.notify_only {
        return Err(AppError::validation(
            "script",
            "is required unless --notify is set",
        ));
    }

    if let Some(log) = req.log_basename.as_deref().filter(|l| !l.is_empty()) {
        validate_probe_name(log)
            .map_err(|e| AppError::validation("log", format!("is not a valid file name ({})", e)))?;
    }

    Ok(duration)
}

/// Execute schedule use case
///
/// The worker is started first and the record written second, so a failed
/// spawn never leaves a record behind. A failed write after a successful
/// spawn is reported as `AppError::Persist`; the worker keeps running.
pub async fn execute(
    store: &dyn ProbeStore,
    spawner: &dyn WorkerSpawner,
    time_provider: &dyn TimeProvider,
    log_dir: &Path,
    req: ScheduleRequest,
) -> Result<ProbeRecord> {
    let duration = validate_request(&req)?;

    let basename = req
        .log_basename
        .clone()
        .filter(|b| !b.is_empty())
        .unwrap_or_else(|| req.name.clone());
    let log_path = log_dir.join(format!("{}.{}", basename, LOG_EXTENSION));
    let policy = RecurrencePolicy::new(req.recurrent, req.iterations);

    let launch = WorkerLaunch {
        name: req.name.clone(),
        script: req.script.clone(),
        duration,
        policy,
        notify_only: req.notify_only,
        log_path: log_path.clone(),
    };

    let pid = spawner.spawn(&launch).await.map_err(|e| match e {
        AppError::Spawn(_) => e,
        other => AppError::Spawn(other.to_string()),
    })?;

    info!(
        probe = %req.name,
        pid = %pid,
        duration = %duration,
        policy = %policy,
        log_path = %log_path.display(),
        "Worker spawned"
    );

    let record = ProbeRecord {
        name: req.name,
        group: req.group,
        script: req.script,
        log_path,
        duration,
        recurrent: req.recurrent,
        iterations: req.iterations,
        pid,
        created_at: time_provider.now().trunc_subsecs(0),
        notify_only: req.notify_only,
    };

    if let Err(e) = store.put(&record).await {
        error!(
            probe = %record.name,
            pid = %pid,
            error = %e,
            "Worker is running but its metadata could not be written"
        );
        return Err(AppError::Persist {
            name: record.name,
            pid,
            reason: e.to_string(),
        });
    }

    Ok(record)
}
