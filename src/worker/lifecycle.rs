//! Controller lifecycle states and legal transitions.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Constructed, not yet installing
    Parsed,
    /// Populating its cache generation
    Installing,
    /// Installed, waiting to take over
    Waiting,
    /// Purging stale generations
    Activating,
    /// Intercepting requests
    Active,
    /// Replaced by a newer version or failed to install
    Superseded,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkerState::Parsed => "parsed",
            WorkerState::Installing => "installing",
            WorkerState::Waiting => "waiting",
            WorkerState::Activating => "activating",
            WorkerState::Active => "active",
            WorkerState::Superseded => "superseded",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("cannot move from {from} to {to}")]
    InvalidTransition { from: WorkerState, to: WorkerState },
}

impl WorkerState {
    /// Validates a move to `to`.
    pub fn transition(self, to: WorkerState) -> Result<WorkerState, LifecycleError> {
        use WorkerState::*;

        let allowed = matches!(
            (self, to),
            (Parsed, Installing)
                | (Installing, Waiting)
                | (Waiting, Activating)
                | (Activating, Active)
        ) || (to == Superseded && self != Superseded);

        if allowed {
            Ok(to)
        } else {
            Err(LifecycleError::InvalidTransition { from: self, to })
        }
    }
}
