//! `ScheduleEvaluator` — decides whether an agent should start a deep rest now.
//!
//! # Algorithm
//!
//! ```text
//! Manual                 → never
//! Exhaustion(lead)       → ticks_left <= lead
//! Calendar(a, b)
//!   ① ticks_left <= safety_lead                      → rest   (safety net)
//!   ② local period ∉ {a, b}                          → wait   (window gate)
//!   ③ never rested                                   → rest   (first window)
//!   ④ last_completion < window_start                 → rest   (new occurrence)
//!      otherwise                                     → wait   (already rested)
//!
//! ticks_left   = floor((1 - level) * full_cycle_ticks)
//! window_start = floor(now / PERIOD) * PERIOD - HALF_DAY
//! ```
//!
//! # Window start
//!
//! A period boundary seen from one time zone can sit up to half a day away
//! from the same boundary seen from another.  Step ④ therefore ignores the
//! agent's longitude entirely: it truncates the absolute tick to its
//! period-length bucket, which is the same instant everywhere on the planet,
//! and moves it half a day earlier.  An agent that finished resting near the
//! start of its window and then crossed into a zone where that window seems
//! to start again still counts as rested.  The shift only ever enlarges the
//! "already rested" region.
//!
//! [`WindowAnchor::AgentLocal`] keeps the older formulation, which derives the
//! boundary from the agent's current zone.  It re-triggers after a westward
//! hop and exists only so the two can be compared.
//!
//! Evaluation is a pure read.  Nothing here mutates `AgentRestState`.

use std::fmt;

use dr_core::calendar::{local_period_start, period_at, planetary_period_start};
use dr_core::{AbsTick, CalendarPeriod, Clock, TICKS_PER_DAY, TICKS_PER_HALF_DAY};

use crate::{AgentRestState, Discipline, RestAgent};

/// Ticks from fully rested to fully exhausted: 30 days.
pub const FULL_CYCLE_TICKS: i64 = 30 * TICKS_PER_DAY;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Which boundary step ④ measures "this occurrence of the window" from.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowAnchor {
    /// Planet-wide period bucket, half a day early.  Independent of where
    /// the agent is.
    #[default]
    Planetary,
    /// Start of the agent's local period, converted to absolute time.
    AgentLocal,
}

/// Tunables shared with the host's need model.
#[derive(Copy, Clone, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Ticks for the need to go from fully rested to exhausted.
    pub full_cycle_ticks: i64,
    /// Lead time of the exhaustion safety net under calendar modes.
    pub safety_lead_ticks: i64,
    /// Boundary used for the calendar hysteresis test.
    pub window_anchor: WindowAnchor,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            full_cycle_ticks:  FULL_CYCLE_TICKS,
            safety_lead_ticks: TICKS_PER_DAY,
            window_anchor:     WindowAnchor::Planetary,
        }
    }
}

// ── Decision ──────────────────────────────────────────────────────────────────

/// The outcome of one evaluation, with the reason behind it.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RestDecision {
    /// Agent is not eligible; nothing was evaluated.
    Ineligible,
    /// Mode is `Manual`.
    Manual,
    /// Not close enough to exhaustion (or no need at all).
    NotDue,
    /// Within the lead time of exhaustion.  Triggers.
    ExhaustionImminent { ticks_left: i64 },
    /// Local period is outside the mode's window.
    OutsideWindow { local: CalendarPeriod },
    /// Inside the window with no rest ever recorded.  Triggers.
    FirstWindow,
    /// Inside the window and the last rest predates this occurrence.  Triggers.
    WindowDue { window_start: AbsTick },
    /// Inside the window but already rested during this occurrence.
    AlreadyRested { window_start: AbsTick },
}

impl RestDecision {
    /// `true` if the agent should be sent to deep rest.
    #[inline]
    pub fn should_rest(self) -> bool {
        matches!(
            self,
            RestDecision::ExhaustionImminent { .. }
                | RestDecision::FirstWindow
                | RestDecision::WindowDue { .. }
        )
    }
}

impl fmt::Display for RestDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestDecision::Ineligible => f.write_str("not eligible"),
            RestDecision::Manual => f.write_str("manual"),
            RestDecision::NotDue => f.write_str("not due"),
            RestDecision::ExhaustionImminent { ticks_left } => {
                write!(f, "exhaustion in {ticks_left} ticks")
            }
            RestDecision::OutsideWindow { local } => write!(f, "outside window ({local})"),
            RestDecision::FirstWindow => f.write_str("first window"),
            RestDecision::WindowDue { window_start } => {
                write!(f, "window due (since {window_start})")
            }
            RestDecision::AlreadyRested { window_start } => {
                write!(f, "already rested (since {window_start})")
            }
        }
    }
}

// ── ScheduleEvaluator ─────────────────────────────────────────────────────────

/// Stateless decision function.  One instance serves every agent.
#[derive(Copy, Clone, Debug, Default)]
pub struct ScheduleEvaluator {
    config: EvaluatorConfig,
}

impl ScheduleEvaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Should this agent enter deep rest right now?
    ///
    /// `exhaustion_level` is `None` when the agent has no deep-rest need.
    pub fn should_enter_rest_now<C: Clock + ?Sized>(
        &self,
        state:            &AgentRestState,
        exhaustion_level: Option<f64>,
        longitude:        f64,
        clock:            &C,
    ) -> bool {
        self.decide(state, exhaustion_level, longitude, clock).should_rest()
    }

    /// Evaluate a host agent, honouring its eligibility gate.
    pub fn evaluate_agent<A, C>(&self, state: &AgentRestState, agent: &A, clock: &C) -> RestDecision
    where
        A: RestAgent + ?Sized,
        C: Clock + ?Sized,
    {
        if !agent.has_active_eligibility() {
            return RestDecision::Ineligible;
        }
        self.decide(state, agent.exhaustion_level(), agent.longitude(), clock)
    }

    /// Full decision with its reason.
    pub fn decide<C: Clock + ?Sized>(
        &self,
        state:            &AgentRestState,
        exhaustion_level: Option<f64>,
        longitude:        f64,
        clock:            &C,
    ) -> RestDecision {
        match state.mode().discipline() {
            Discipline::Manual => RestDecision::Manual,

            Discipline::Exhaustion { lead_ticks } => {
                self.exhaustion_check(exhaustion_level, lead_ticks)
            }

            Discipline::Calendar { first, second } => {
                // ① Never let an agent run dry waiting for its window.
                let safety = self.exhaustion_check(exhaustion_level, self.config.safety_lead_ticks);
                if safety.should_rest() {
                    return safety;
                }

                // ② Inert outside the window.
                let now = clock.absolute_tick();
                let local = period_at(now, longitude);
                if local != first && local != second {
                    return RestDecision::OutsideWindow { local };
                }

                // ③ No history: rest now rather than wait a cycle.
                let Some(last) = state.last_completion() else {
                    return RestDecision::FirstWindow;
                };

                // ④ Once per occurrence.
                let window_start = self.window_start(now, longitude);
                if last < window_start {
                    RestDecision::WindowDue { window_start }
                } else {
                    RestDecision::AlreadyRested { window_start }
                }
            }
        }
    }

    /// Absolute tick from which a completed rest counts toward the current
    /// occurrence of the window.
    pub fn window_start(&self, now: AbsTick, longitude: f64) -> AbsTick {
        match self.config.window_anchor {
            WindowAnchor::Planetary => planetary_period_start(now) - TICKS_PER_HALF_DAY,
            WindowAnchor::AgentLocal => local_period_start(now, longitude),
        }
    }

    /// Ticks left before full exhaustion at `level`, floored to whole ticks.
    ///
    /// `None` for agents without a need, or with a level that is not a number.
    pub fn ticks_until_exhausted(&self, level: Option<f64>) -> Option<i64> {
        let level = level.filter(|l| !l.is_nan())?.clamp(0.0, 1.0);
        let remaining = (1.0 - level) * self.config.full_cycle_ticks as f64;
        Some(remaining.floor() as i64)
    }

    fn exhaustion_check(&self, level: Option<f64>, lead_ticks: i64) -> RestDecision {
        match self.ticks_until_exhausted(level) {
            Some(ticks_left) if ticks_left <= lead_ticks => {
                RestDecision::ExhaustionImminent { ticks_left }
            }
            _ => RestDecision::NotDue,
        }
    }
}
