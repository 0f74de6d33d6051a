// Domain Layer - Probe records, durations and the engine state machine

pub mod duration;
pub mod error;
pub mod probe;
pub mod state;

// Re-exports
pub use duration::ProbeDuration;
pub use error::DomainError;
pub use probe::{ProbeRecord, RecurrencePolicy};
pub use state::EngineState;
