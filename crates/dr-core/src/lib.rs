//! `dr-core` — foundational types for the `deeprest` scheduling framework.
//!
//! This crate is a dependency of every other `dr-*` crate.  It has no `dr-*`
//! dependencies and a single required external one (`thiserror`), plus
//! optional `serde`.
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `AgentId`                                                 |
//! | [`time`]        | `GameTick`, `AbsTick`, `Clock`, `ClockSnapshot`, `SimClock`, tick constants |
//! | [`calendar`]    | `CalendarPeriod`, longitude → local day / hour / period   |
//! | [`error`]       | `DrError`, `DrResult`                                     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod calendar;
pub mod error;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use calendar::CalendarPeriod;
pub use error::{DrError, DrResult};
pub use ids::AgentId;
pub use time::{
    AbsTick, Clock, ClockSnapshot, GameTick, SimClock, TICKS_PER_DAY, TICKS_PER_HALF_DAY,
    TICKS_PER_HOUR, TICKS_PER_PERIOD, TICKS_PER_YEAR,
};
