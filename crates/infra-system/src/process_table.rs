// Unix process table
// reason: nix for signal-level liveness and SIGTERM, sysinfo for scheduler state

use async_trait::async_trait;
use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use sysinfo::{ProcessStatus, System};
use tracing::{debug, info};

use hypnos_core::error::{AppError, Result};
use hypnos_core::port::{LivenessProber, ProcessSignaller, ProcessState, SignalDelivery};

/// Liveness probing and signalling against the live OS process table
#[derive(Debug, Default, Clone, Copy)]
pub struct UnixProcessTable;

impl UnixProcessTable {
    pub fn new() -> Self {
        Self
    }
}

/// PIDs <= 0 address process groups under kill(2), never a single worker
fn worker_pid(pid: i32) -> Option<Pid> {
    (pid > 0).then(|| Pid::from_raw(pid))
}

fn map_status(status: ProcessStatus) -> ProcessState {
    match status {
        ProcessStatus::Zombie | ProcessStatus::Dead => ProcessState::Defunct,
        ProcessStatus::Stop | ProcessStatus::Tracing => ProcessState::Suspended,
        ProcessStatus::Unknown(_) => ProcessState::Unknown,
        _ => ProcessState::Runnable,
    }
}

impl LivenessProber for UnixProcessTable {
    fn is_alive(&self, pid: i32) -> Result<bool> {
        let Some(target) = worker_pid(pid) else {
            return Ok(false);
        };

        // Signal 0 checks existence without delivering anything
        match kill(target, None) {
            Ok(()) => Ok(true),
            Err(Errno::EPERM) => Ok(true),
            Err(Errno::ESRCH) => Ok(false),
            Err(e) => Err(AppError::Probe {
                pid,
                reason: e.to_string(),
            }),
        }
    }

    fn process_state(&self, pid: i32) -> ProcessState {
        if pid <= 0 {
            return ProcessState::Unknown;
        }

        let sys_pid = sysinfo::Pid::from_u32(pid as u32);
        let mut sys = System::new();
        if !sys.refresh_process(sys_pid) {
            return ProcessState::Unknown;
        }

        let state = sys
            .process(sys_pid)
            .map(|p| map_status(p.status()))
            .unwrap_or(ProcessState::Unknown);
        debug!(pid = %pid, state = ?state, "Process state probed");
        state
    }
}

#[async_trait]
impl ProcessSignaller for UnixProcessTable {
    async fn terminate(&self, pid: i32) -> Result<SignalDelivery> {
        let target = worker_pid(pid).ok_or_else(|| AppError::Signal {
            pid,
            reason: "refusing to signal a non-positive pid".to_string(),
        })?;

        info!(pid = %pid, "Sending SIGTERM");
        match kill(target, Signal::SIGTERM) {
            Ok(()) => Ok(SignalDelivery::Delivered),
            Err(Errno::ESRCH) => Ok(SignalDelivery::AlreadyGone),
            Err(e) => Err(AppError::Signal {
                pid,
                reason: e.to_string(),
            }),
        }
    }
}
