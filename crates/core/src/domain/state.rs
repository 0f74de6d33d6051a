// Downtime Engine state machine
//
// Idle -> Waiting -> Firing -> (Waiting | Done)

use std::fmt;

use crate::domain::error::{DomainError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Waiting,
    Firing,
    Done,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineState::Idle => write!(f, "IDLE"),
            EngineState::Waiting => write!(f, "WAITING"),
            EngineState::Firing => write!(f, "FIRING"),
            EngineState::Done => write!(f, "DONE"),
        }
    }
}

impl EngineState {
    /// Move to `next`, rejecting edges the engine must never take
    pub fn transition(self, next: EngineState) -> Result<EngineState> {
        use EngineState::*;
        match (self, next) {
            (Idle, Waiting) | (Waiting, Firing) | (Firing, Waiting) | (Firing, Done) => Ok(next),
            _ => Err(DomainError::InvalidStateTransition {
                from: self.to_string(),
                to: next.to_string(),
            }),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, EngineState::Done)
    }
}
