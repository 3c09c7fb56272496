//! `dr-schedule` — when should an agent go into deep rest?
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`mode`]      | `ScheduleMode` catalog, `Discipline`                        |
//! | [`state`]     | `AgentRestState` (mode + last completion tick)              |
//! | [`evaluator`] | `ScheduleEvaluator`, `EvaluatorConfig`, `RestDecision`      |
//! | [`agent`]     | `RestAgent` host trait, `AgentSample`                       |
//! | [`loader`]    | `load_states_csv`, `write_states_csv` and reader/writer forms |
//! | [`error`]     | `ScheduleError`, `ScheduleResult<T>`                        |
//!
//! # Host contract (summary)
//!
//! ```text
//! each evaluation tick, for each eligible agent:
//!     if evaluator.should_enter_rest_now(&state, level, longitude, &clock)
//!         host sends the agent to rest
//! when the rest finishes:
//!     state.notify_rest_completed(&clock)
//! when the agent stops being eligible:
//!     state.notify_eligibility_lost()
//! ```

pub mod agent;
pub mod error;
pub mod evaluator;
pub mod loader;
pub mod mode;
pub mod state;


pub use agent::{AgentSample, RestAgent};
pub use error::{ScheduleError, ScheduleResult};
pub use evaluator::{EvaluatorConfig, FULL_CYCLE_TICKS, RestDecision, ScheduleEvaluator, WindowAnchor};
pub use loader::{load_states_csv, load_states_reader, write_states_csv, write_states_writer};
pub use mode::{Discipline, ScheduleMode};
pub use state::AgentRestState;
