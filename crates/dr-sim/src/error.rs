use dr_core::{AgentId, DrError};
use dr_schedule::ScheduleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("unknown agent {0}")]
    UnknownAgent(AgentId),

    #[error(transparent)]
    Core(DrError),

    #[error("schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DrError> for SimError {
    fn from(err: DrError) -> Self {
        match err {
            DrError::AgentNotFound(agent) => SimError::UnknownAgent(agent),
            other => SimError::Core(other),
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;
