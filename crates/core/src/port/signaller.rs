// Process Signaller Port
//
// The only channel from short-lived commands to a running worker.

use async_trait::async_trait;

use crate::error::Result;
use crate::port::LivenessProber;

/// Outcome of asking a worker to shut down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalDelivery {
    /// The process existed and was signalled
    Delivered,
    /// No such process; the desired end state already holds
    AlreadyGone,
}

/// Anything that can signal a worker can also tell whether it has already
/// exited, so callers never signal an unreaped (defunct) worker.
#[async_trait]
pub trait ProcessSignaller: LivenessProber + Send + Sync {
    /// Send a graceful termination signal to `pid`
    ///
    /// # Errors
    /// - AppError::Signal for any failure other than "process absent"
    async fn terminate(&self, pid: i32) -> Result<SignalDelivery>;
}
