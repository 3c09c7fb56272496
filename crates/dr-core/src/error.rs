//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `DrError` as one variant
//! where core failures can surface through them.

use thiserror::Error;

use crate::AgentId;

/// The top-level error type for `dr-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum DrError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("agent count {0} exceeds the AgentId range")]
    TooManyAgents(usize),

    #[error("{what} has {got} entries, expected {expected}")]
    LengthMismatch {
        what:     &'static str,
        expected: usize,
        got:      usize,
    },
}

/// Shorthand result type for all `dr-*` crates.
pub type DrResult<T> = Result<T, DrError>;
