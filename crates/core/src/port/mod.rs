// Port Layer - Interfaces for external dependencies

pub mod liveness;
pub mod notifier;
pub mod probe_log;
pub mod probe_store;
pub mod script_executor;
pub mod signaller;
pub mod spawner;
pub mod time_provider;

// Re-exports
pub use liveness::{LivenessProber, ProcessState};
pub use notifier::Notifier;
pub use probe_log::{LogStore, ProbeLog};
pub use probe_store::ProbeStore;
pub use script_executor::ScriptExecutor;
pub use signaller::{ProcessSignaller, SignalDelivery};
pub use spawner::{WorkerLaunch, WorkerSpawner, WORKER_SUBCOMMAND};
pub use time_provider::TimeProvider;
