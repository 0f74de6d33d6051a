// Detached worker spawner
//
// The worker gets its own session so it survives the launching terminal, and
// its stdout/stderr are appended to the probe log.

use async_trait::async_trait;
use std::fs::{File, OpenOptions};
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::info;

use hypnos_core::error::{AppError, Result};
use hypnos_core::port::{WorkerLaunch, WorkerSpawner};

pub struct DetachedSpawner {
    exe: PathBuf,
}

impl DetachedSpawner {
    /// # Arguments
    /// * `exe` - Binary that understands the worker subcommand
    pub fn new(exe: impl Into<PathBuf>) -> Self {
        Self { exe: exe.into() }
    }

    /// Spawner that re-executes the running binary
    pub fn current_exe() -> Result<Self> {
        let exe = std::env::current_exe()
            .map_err(|e| AppError::Spawn(format!("cannot locate own executable: {}", e)))?;
        Ok(Self::new(exe))
    }

    pub fn exe(&self) -> &Path {
        &self.exe
    }
}

fn open_log(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn spawn_err(launch: &WorkerLaunch, e: impl std::fmt::Display) -> AppError {
    AppError::Spawn(format!("{}: {}", launch.name, e))
}

#[async_trait]
impl WorkerSpawner for DetachedSpawner {
    async fn spawn(&self, launch: &WorkerLaunch) -> Result<i32> {
        let stdout = open_log(&launch.log_path).map_err(|e| spawn_err(launch, e))?;
        let stderr = stdout.try_clone().map_err(|e| spawn_err(launch, e))?;

        let mut command = Command::new(&self.exe);
        command
            .args(launch.to_args())
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr));

        // SAFETY: setsid is async-signal-safe and touches no parent state
        unsafe {
            command.pre_exec(|| {
                nix::unistd::setsid()
                    .map(|_| ())
                    .map_err(std::io::Error::from)
            });
        }

        let child = command.spawn().map_err(|e| spawn_err(launch, e))?;
        let pid = child.id() as i32;

        info!(
            probe = %launch.name,
            pid = %pid,
            log = %launch.log_path.display(),
            "Worker spawned"
        );
        Ok(pid)
    }
}
