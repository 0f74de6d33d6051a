// Liveness Prober Port
//
// A stored PID is only a hint: the worker may have exited and the PID may
// since have been reused. Consumers re-derive liveness on every read.

use crate::error::Result;

/// Coarse OS scheduling state of a live process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// Running or sleeping normally
    Runnable,
    /// Stopped by a signal or traced
    Suspended,
    /// Exited but not yet reaped
    Defunct,
    /// The OS did not report a state
    Unknown,
}

pub trait LivenessProber: Send + Sync {
    /// Whether `pid` exists, using a zero-effect existence probe
    ///
    /// A process owned by someone else counts as alive.
    ///
    /// # Errors
    /// - AppError::Probe for OS failures other than "no such process"
    fn is_alive(&self, pid: i32) -> Result<bool>;

    /// Finer-grained state, when the platform can tell
    fn process_state(&self, _pid: i32) -> ProcessState {
        ProcessState::Unknown
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use crate::port::signaller::{ProcessSignaller, SignalDelivery};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    struct FakeProcess {
        state: ProcessState,
        probe_error: Option<String>,
        signal_error: Option<String>,
    }

    /// Fake process table; a delivered SIGTERM removes the process
    #[derive(Default)]
    pub struct FakeProcessTable {
        procs: Mutex<HashMap<i32, FakeProcess>>,
        signalled: Mutex<Vec<i32>>,
    }

    impl FakeProcessTable {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn spawn(&self, pid: i32) {
            self.spawn_with_state(pid, ProcessState::Runnable);
        }

        pub fn spawn_with_state(&self, pid: i32, state: ProcessState) {
            self.procs.lock().unwrap().insert(
                pid,
                FakeProcess {
                    state,
                    probe_error: None,
                    signal_error: None,
                },
            );
        }

        pub fn exit(&self, pid: i32) {
            self.procs.lock().unwrap().remove(&pid);
        }

        /// Make `is_alive(pid)` fail with an OS error
        pub fn fail_probe(&self, pid: i32, reason: impl Into<String>) {
            self.procs
                .lock()
                .unwrap()
                .entry(pid)
                .or_insert(FakeProcess {
                    state: ProcessState::Unknown,
                    probe_error: None,
                    signal_error: None,
                })
                .probe_error = Some(reason.into());
        }

        /// Make signalling `pid` fail with an OS error other than "absent"
        pub fn fail_signal(&self, pid: i32, reason: impl Into<String>) {
            if let Some(p) = self.procs.lock().unwrap().get_mut(&pid) {
                p.signal_error = Some(reason.into());
            }
        }

        pub fn is_running(&self, pid: i32) -> bool {
            self.procs.lock().unwrap().contains_key(&pid)
        }

        pub fn signalled(&self) -> Vec<i32> {
            self.signalled.lock().unwrap().clone()
        }
    }

    impl LivenessProber for FakeProcessTable {
        fn is_alive(&self, pid: i32) -> Result<bool> {
            match self.procs.lock().unwrap().get(&pid) {
                Some(FakeProcess {
                    probe_error: Some(reason),
                    ..
                }) => Err(AppError::Probe {
                    pid,
                    reason: reason.clone(),
                }),
                Some(_) => Ok(true),
                None => Ok(false),
            }
        }

        fn process_state(&self, pid: i32) -> ProcessState {
            self.procs
                .lock()
                .unwrap()
                .get(&pid)
                .map(|p| p.state)
                .unwrap_or(ProcessState::Unknown)
        }
    }

    #[async_trait]
    impl ProcessSignaller for FakeProcessTable {
        async fn terminate(&self, pid: i32) -> Result<SignalDelivery> {
            self.signalled.lock().unwrap().push(pid);
            let mut procs = self.procs.lock().unwrap();
            match procs.get(&pid) {
                None => Ok(SignalDelivery::AlreadyGone),
                Some(FakeProcess {
                    signal_error: Some(reason),
                    ..
                }) => Err(AppError::Signal {
                    pid,
                    reason: reason.clone(),
                }),
                Some(_) => {
                    procs.remove(&pid);
                    Ok(SignalDelivery::Delivered)
                }
            }
        }
    }
}
