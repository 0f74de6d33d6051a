// Downtime Engine - worker side of the probe lifecycle
//
// Runs inside the detached worker process. One logical thread of control:
// wait, fire (script then notification), repeat until the recurrence policy
// is exhausted. Termination comes from outside as an OS signal; there is no
// cancellation channel.

use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::application::constants::{NOTIFY_MESSAGE, NOTIFY_TITLE_PREFIX};
use crate::domain::{EngineState, ProbeDuration, RecurrencePolicy};
use crate::error::Result;
use crate::port::{Notifier, ProbeLog, ScriptExecutor, WorkerLaunch};

/// What one worker runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub name: String,
    pub script: String,
    pub duration: ProbeDuration,
    pub policy: RecurrencePolicy,
    pub notify_only: bool,
}

impl From<&WorkerLaunch> for EngineConfig {
    fn from(launch: &WorkerLaunch) -> Self {
        Self {
            name: launch.name.clone(),
            script: launch.script.clone(),
            duration: launch.duration,
            policy: launch.policy,
            notify_only: launch.notify_only,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSummary {
    /// Completed fire cycles
    pub cycles: u32,
}

pub struct DowntimeEngine {
    config: EngineConfig,
    executor: Arc<dyn ScriptExecutor>,
    notifier: Arc<dyn Notifier>,
    log: Arc<dyn ProbeLog>,
}

impl DowntimeEngine {
    pub fn new(
        config: EngineConfig,
        executor: Arc<dyn ScriptExecutor>,
        notifier: Arc<dyn Notifier>,
        log: Arc<dyn ProbeLog>,
    ) -> Self {
        Self {
            config,
            executor,
            notifier,
            log,
        }
    }

    /// Drive the state machine until `Done`
    ///
    /// Never returns for an unbounded recurrent probe.
    pub async fn run(&self) -> Result<EngineSummary> {
        let mut state = EngineState::Idle;
        let mut cycles: u32 = 0;

        loop {
            let next = match state {
                EngineState::Idle => {
                    self.record(&format!(
                        "Downtime {:?} started for {} ({})",
                        self.config.name, self.config.duration, self.config.policy
                    ))
                    .await;
                    EngineState::Waiting
                }
                EngineState::Waiting => {
                    sleep(self.config.duration.as_duration()).await;
                    EngineState::Firing
                }
                EngineState::Firing => {
                    self.fire().await;
                    cycles = cycles.saturating_add(1);
                    if self.config.policy.is_exhausted(cycles) {
                        EngineState::Done
                    } else {
                        self.record(&format!(
                            "iteration {} complete, restarting timer",
                            cycles
                        ))
                        .await;
                        EngineState::Waiting
                    }
                }
                EngineState::Done => {
                    self.record(&format!(
                        "Downtime {:?} fully complete (ran {} times)",
                        self.config.name, cycles
                    ))
                    .await;
                    return Ok(EngineSummary { cycles });
                }
            };

            debug!(probe = %self.config.name, from = %state, to = %next, "Engine transition");
            state = state.transition(next)?;
        }
    }

    /// One fire cycle: script (unless notify-only), then notification
    ///
    /// A failed script never suppresses the notification attempt.
    async fn fire(&self) {
        if !self.config.notify_only {
            self.record("timer fired, executing script").await;
            match self.executor.exec(&self.config.script).await {
                Ok(()) => self.record("script succeeded").await,
                Err(e) => self.record(&format!("script failed: {}", e)).await,
            }
        }

        self.record("timer fired, sending notification").await;
        let title = format!("{}{}", NOTIFY_TITLE_PREFIX, self.config.name);
        match self.notifier.notify(&title, NOTIFY_MESSAGE).await {
            Ok(()) => self.record("notify succeeded").await,
            Err(e) => self.record(&format!("notify failed: {}", e)).await,
        }
    }

    async fn record(&self, line: &str) {
        if let Err(e) = self.log.append(line).await {
            warn!(probe = %self.config.name, error = %e, line = %line, "Failed to append to probe log");
        }
    }
}
