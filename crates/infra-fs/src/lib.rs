// Hypnos Infrastructure - Filesystem Adapters
// Implements: ProbeStore (JSON records), LogStore (append-only probe logs)

mod layout;
mod probe_log;
mod probe_store;

pub use layout::HypnosDirs;
pub use probe_log::{FileLogStore, FileProbeLog};
pub use probe_store::JsonProbeStore;
