//! One module per subcommand. Each returns the process exit code on success
//! and leaves error reporting to `main`.

pub mod awaken;
pub mod scan;
pub mod schedule;
pub mod stasis;
pub mod terminate;
pub mod worker;

use std::sync::Arc;

use hypnos_core::port::time_provider::SystemTimeProvider;
use hypnos_core::port::TimeProvider;
use hypnos_infra_fs::{FileLogStore, HypnosDirs, JsonProbeStore};

/// Adapters shared by the short-lived commands
pub struct Context {
    pub dirs: HypnosDirs,
    pub store: Arc<JsonProbeStore>,
    pub logs: Arc<FileLogStore>,
    pub time_provider: Arc<dyn TimeProvider>,
}

impl Context {
    pub fn new(dirs: HypnosDirs) -> Self {
        let time_provider: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
        Self {
            store: Arc::new(JsonProbeStore::new(&dirs.probe)),
            logs: Arc::new(FileLogStore::new(time_provider.clone())),
            time_provider,
            dirs,
        }
    }
}
