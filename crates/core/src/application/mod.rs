// Application Layer - Probe lifecycle use cases

pub mod constants;
pub mod engine;
pub mod scanner;
pub mod supervisor;
pub mod terminator;

// Re-exports
pub use engine::{DowntimeEngine, EngineConfig, EngineSummary};
pub use scanner::{ProbeScanner, ProbeStatus, ScanReport, ScanWarning, StatusRow};
pub use supervisor::{ProbeSupervisor, ScheduleRequest};
pub use terminator::{
    BatchTermination, LogCleanup, ProbeTerminator, TerminationMode, TerminationOutcome,
};
