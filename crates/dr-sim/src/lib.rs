//! `dr-sim` — reference host for the deep-rest scheduler.
//!
//! A small tick-driven colony: it owns the clock, each agent's longitude,
//! exhaustion need and eligibility, and a [`RestRoster`] of scheduler state.
//! Rests triggered by the evaluator run for a fixed duration and are then
//! reported back through `notify_rest_completed`.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Eligibility  agents that lost eligibility since the last tick have
//!                  their rest state reset and any rest in progress cancelled.
//!   ② Completions  rests whose end tick has arrived complete, in ascending
//!                  AgentId order; the need resets to zero.
//!   ③ Need         resting agents recover, everyone else tires by one tick.
//!   ④ Evaluate     every eval_interval_ticks, ask the evaluator about each
//!                  eligible idle agent against one frozen ClockSnapshot
//!                  (parallel with the `parallel` feature).
//!   ⑤ Apply        triggered agents start resting, ascending AgentId.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Runs the evaluation phase on Rayon's thread pool.       |
//! | `fx-hash`  | Uses `FxHashMap` for the active-rest index.             |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use dr_schedule::ScheduleMode;
//! use dr_sim::{ColonyBuilder, RestRoster, SimBuilder, SimConfig, TracingObserver};
//!
//! let colony = ColonyBuilder::new(100).build()?;
//! let mut sim = SimBuilder::new(SimConfig::default(), colony)
//!     .roster(RestRoster::with_mode(100, ScheduleMode::ExhaustionOneDay))
//!     .build()?;
//! sim.run(&mut TracingObserver::default())?;
//! ```

pub mod builder;
pub mod colony;
pub mod config;
pub mod error;
pub mod need;
pub mod observer;
pub mod roster;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use colony::{AgentView, Colony, ColonyBuilder};
pub use config::SimConfig;
pub use error::{SimError, SimResult};
pub use need::DeepRestNeed;
pub use observer::{NoopObserver, RestEvent, RestLog, SimObserver, TracingObserver};
pub use roster::RestRoster;
pub use sim::{RestJob, RestMap, RestSim};
