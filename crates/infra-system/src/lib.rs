// Hypnos Infrastructure - System Adapters
// Implements: LivenessProber, ProcessSignaller, WorkerSpawner, ScriptExecutor, Notifier

#[cfg(not(unix))]
compile_error!("hypnos-infra-system supports Unix-like platforms only");

pub mod desktop_notifier;
pub mod detached_spawner;
pub mod process_table;
pub mod shell_executor;

pub use desktop_notifier::{DesktopNotifier, NotifierBackend};
pub use detached_spawner::DetachedSpawner;
pub use process_table::UnixProcessTable;
pub use shell_executor::{ShellScriptExecutor, DEFAULT_ENV_ALLOWLIST};
