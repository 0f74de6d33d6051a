// Worker Spawner Port
//
// The launcher re-executes its own binary with a hidden subcommand. Every
// parameter travels as an explicit argument: the worker outlives the launcher
// and must not depend on its environment.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::{ProbeDuration, RecurrencePolicy};
use crate::error::Result;

/// Hidden subcommand the worker process is started with
pub const WORKER_SUBCOMMAND: &str = "hibernate-run";

/// Fully-resolved parameters of one worker process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerLaunch {
    pub name: String,
    pub script: String,
    pub duration: ProbeDuration,
    pub policy: RecurrencePolicy,
    pub notify_only: bool,
    pub log_path: PathBuf,
}

impl WorkerLaunch {
    /// Command-line arguments for the worker, subcommand first
    ///
    /// Values use the `--flag=value` form so scripts starting with `-` survive.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            WORKER_SUBCOMMAND.to_string(),
            format!("--probe={}", self.name),
            format!("--script={}", self.script),
            format!("--duration={}", self.duration),
            format!("--iterations={}", self.policy.iterations),
            format!("--log-path={}", self.log_path.display()),
        ];
        if self.policy.recurrent {
            args.push("--recurrent".to_string());
        }
        if self.notify_only {
            args.push("--notify".to_string());
        }
        args
    }
}

#[async_trait]
pub trait WorkerSpawner: Send + Sync {
    /// Start a detached worker with its output appended to `launch.log_path`
    ///
    /// # Returns
    /// The worker's process id
    ///
    /// # Errors
    /// - AppError::Spawn if the process could not be started
    async fn spawn(&self, launch: &WorkerLaunch) -> Result<i32>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::Mutex;

    /// Spawner handing out sequential fake PIDs
    pub struct MockWorkerSpawner {
        next_pid: Mutex<i32>,
        fail: Mutex<Option<String>>,
        launches: Mutex<Vec<WorkerLaunch>>,
    }

    impl MockWorkerSpawner {
        pub fn new(first_pid: i32) -> Self {
            Self {
                next_pid: Mutex::new(first_pid),
                fail: Mutex::new(None),
                launches: Mutex::new(Vec::new()),
            }
        }

        pub fn new_failing(reason: impl Into<String>) -> Self {
            let spawner = Self::new(1);
            *spawner.fail.lock().unwrap() = Some(reason.into());
            spawner
        }

        pub fn launches(&self) -> Vec<WorkerLaunch> {
            self.launches.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WorkerSpawner for MockWorkerSpawner {
        async fn spawn(&self, launch: &WorkerLaunch) -> Result<i32> {
            if let Some(reason) = self.fail.lock().unwrap().clone() {
                return Err(AppError::Spawn(reason));
            }
            self.launches.lock().unwrap().push(launch.clone());
            let mut next = self.next_pid.lock().unwrap();
            let pid = *next;
            *next += 1;
            Ok(pid)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_encode_every_parameter() {
        let launch = WorkerLaunch {
            name: "focus".to_string(),
            script: "say done".to_string(),
            duration: ProbeDuration::from_secs(2),
            policy: RecurrencePolicy::new(true, 3),
            notify_only: true,
            log_path: PathBuf::from("/tmp/hypnos/log/focus.log"),
        };

        let args = launch.to_args();
        assert_eq!(args[0], WORKER_SUBCOMMAND);
        for expected in [
            "--probe=focus",
            "--script=say done",
            "--duration=2s",
            "--iterations=3",
            "--log-path=/tmp/hypnos/log/focus.log",
            "--recurrent",
            "--notify",
        ] {
            assert!(args.contains(&expected.to_string()), "missing {}", expected);
        }
    }

    #[test]
    fn test_flags_omitted_when_unset() {
        let launch = WorkerLaunch {
            name: "mail".to_string(),
            script: "true".to_string(),
            duration: ProbeDuration::from_secs(5),
            policy: RecurrencePolicy::default(),
            notify_only: false,
            log_path: PathBuf::from("/tmp/mail.log"),
        };

        let args = launch.to_args();
        assert!(!args.contains(&"--recurrent".to_string()));
        assert!(!args.contains(&"--notify".to_string()));
    }
}
