//! Per-agent persisted deep-rest state.

use dr_core::{AbsTick, Clock};
use tracing::warn;

use crate::ScheduleMode;

/// The two fields the scheduler owns on each agent.
///
/// - `mode` changes only through [`set_mode`](Self::set_mode) (an explicit
///   player or policy choice) and the eligibility-loss reset.
/// - `last_completion` changes only through
///   [`notify_rest_completed`](Self::notify_rest_completed) and the
///   eligibility-loss reset.
///
/// `last_completion` is either [`AbsTick::NEVER`] or a tick no later than
/// the host's current absolute tick.
#[derive(Copy, Clone, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(from = "PersistedRestState", into = "PersistedRestState")]
pub struct AgentRestState {
    mode: ScheduleMode,
    last_completion: AbsTick,
}

impl Default for AgentRestState {
    fn default() -> Self {
        Self {
            mode:            ScheduleMode::Manual,
            last_completion: AbsTick::NEVER,
        }
    }
}

impl AgentRestState {
    /// A fresh state with `mode` selected and no rest history.
    pub fn new(mode: ScheduleMode) -> Self {
        Self { mode, ..Self::default() }
    }

    /// Rebuild a state from saved fields.
    ///
    /// Completion ticks below `-1` cannot come from a real save; they are
    /// treated as "never rested".
    pub fn restore(mode: ScheduleMode, last_completion_tick: i64) -> Self {
        let last_completion = if last_completion_tick < AbsTick::NEVER.0 {
            warn!(
                last_completion_tick,
                "deep-rest completion tick below the never sentinel, treating as never rested"
            );
            AbsTick::NEVER
        } else {
            AbsTick(last_completion_tick)
        };
        Self { mode, last_completion }
    }

    /// The currently selected mode.
    #[inline]
    pub fn mode(&self) -> ScheduleMode {
        self.mode
    }

    /// Select a new mode.  Rest history is kept.
    pub fn set_mode(&mut self, mode: ScheduleMode) {
        self.mode = mode;
    }

    /// Absolute tick of the last completed rest, or [`AbsTick::NEVER`].
    #[inline]
    pub fn last_completion_tick(&self) -> AbsTick {
        self.last_completion
    }

    /// `Some(tick)` of the last completed rest, `None` if it never happened.
    #[inline]
    pub fn last_completion(&self) -> Option<AbsTick> {
        self.last_completion.is_set().then_some(self.last_completion)
    }

    /// Stamp the current absolute tick as the end of a deep rest.
    ///
    /// Calling this more than once in the same tick writes the same value.
    pub fn notify_rest_completed<C: Clock + ?Sized>(&mut self, clock: &C) {
        self.last_completion = clock.absolute_tick();
    }

    /// Forget everything: back to `Manual` with no rest history.
    ///
    /// Called when the agent loses whatever made it eligible for autonomous
    /// rest, so that regaining it starts from a clean slate.
    pub fn notify_eligibility_lost(&mut self) {
        *self = Self::default();
    }
}

// ── Save-file shape ───────────────────────────────────────────────────────────

/// On-disk field layout.  Missing fields take their defaults.
#[derive(serde::Serialize, serde::Deserialize)]
struct PersistedRestState {
    #[serde(default)]
    mode: ScheduleMode,
    #[serde(default = "never_tick")]
    last_completion_tick: i64,
}

fn never_tick() -> i64 {
    AbsTick::NEVER.0
}

impl From<PersistedRestState> for AgentRestState {
    fn from(raw: PersistedRestState) -> Self {
        AgentRestState::restore(raw.mode, raw.last_completion_tick)
    }
}

impl From<AgentRestState> for PersistedRestState {
    fn from(state: AgentRestState) -> Self {
        PersistedRestState {
            mode:                 state.mode,
            last_completion_tick: state.last_completion.0,
        }
    }
}
