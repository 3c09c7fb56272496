//! Simulation observer trait and the stock observers.

use dr_core::{AgentId, ClockSnapshot};
use dr_schedule::RestDecision;
use tracing::{debug, info};

/// Callbacks invoked by [`RestSim::run`][crate::RestSim::run] at key points
/// in the tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _now: ClockSnapshot) {}

    /// An agent was sent to deep rest.  `reason` is the triggering decision.
    fn on_rest_started(&mut self, _agent: AgentId, _reason: RestDecision, _now: ClockSnapshot) {}

    /// An agent finished a deep rest and its completion tick was stamped.
    fn on_rest_completed(&mut self, _agent: AgentId, _now: ClockSnapshot) {}

    /// A rest in progress was abandoned because the agent lost eligibility.
    fn on_rest_cancelled(&mut self, _agent: AgentId, _now: ClockSnapshot) {}

    /// An agent lost eligibility; its rest state has been reset.
    fn on_eligibility_lost(&mut self, _agent: AgentId, _now: ClockSnapshot) {}

    /// Called at the end of each tick.  `started` is the number of rests
    /// that began this tick.
    fn on_tick_end(&mut self, _now: ClockSnapshot, _started: usize) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _now: ClockSnapshot) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Forwards every event to `tracing`.
///
/// Rest transitions are logged at `debug`, the end of the run at `info`.
#[derive(Default)]
pub struct TracingObserver {
    started:   usize,
    completed: usize,
    cancelled: usize,
}

impl SimObserver for TracingObserver {
    fn on_rest_started(&mut self, agent: AgentId, reason: RestDecision, now: ClockSnapshot) {
        self.started += 1;
        debug!(%agent, %reason, game = now.game.0, abs = now.absolute.0, "deep rest started");
    }

    fn on_rest_completed(&mut self, agent: AgentId, now: ClockSnapshot) {
        self.completed += 1;
        debug!(%agent, game = now.game.0, abs = now.absolute.0, "deep rest completed");
    }

    fn on_rest_cancelled(&mut self, agent: AgentId, now: ClockSnapshot) {
        self.cancelled += 1;
        debug!(%agent, game = now.game.0, "deep rest cancelled");
    }

    fn on_eligibility_lost(&mut self, agent: AgentId, now: ClockSnapshot) {
        debug!(%agent, game = now.game.0, "eligibility lost, rest state reset");
    }

    fn on_sim_end(&mut self, now: ClockSnapshot) {
        info!(
            game = now.game.0,
            abs = now.absolute.0,
            started = self.started,
            completed = self.completed,
            cancelled = self.cancelled,
            "simulation finished"
        );
    }
}

// ── Event log ─────────────────────────────────────────────────────────────────

/// One recorded rest transition.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum RestEvent {
    Started { agent: AgentId, at: ClockSnapshot, reason: RestDecision },
    Completed { agent: AgentId, at: ClockSnapshot },
    Cancelled { agent: AgentId, at: ClockSnapshot },
    EligibilityLost { agent: AgentId, at: ClockSnapshot },
}

impl RestEvent {
    pub fn agent(&self) -> AgentId {
        match *self {
            RestEvent::Started { agent, .. }
            | RestEvent::Completed { agent, .. }
            | RestEvent::Cancelled { agent, .. }
            | RestEvent::EligibilityLost { agent, .. } => agent,
        }
    }
}

/// Records every rest transition in the order it happened.
#[derive(Default, Debug)]
pub struct RestLog {
    pub events: Vec<RestEvent>,
}

impl RestLog {
    /// Snapshots at which `agent` started resting.
    pub fn starts_for(&self, agent: AgentId) -> Vec<ClockSnapshot> {
        self.events
            .iter()
            .filter_map(|e| match *e {
                RestEvent::Started { agent: a, at, .. } if a == agent => Some(at),
                _ => None,
            })
            .collect()
    }

    pub fn count_started(&self) -> usize {
        self.events.iter().filter(|e| matches!(e, RestEvent::Started { .. })).count()
    }

    pub fn count_completed(&self) -> usize {
        self.events.iter().filter(|e| matches!(e, RestEvent::Completed { .. })).count()
    }
}

impl SimObserver for RestLog {
    fn on_rest_started(&mut self, agent: AgentId, reason: RestDecision, at: ClockSnapshot) {
        self.events.push(RestEvent::Started { agent, at, reason });
    }

    fn on_rest_completed(&mut self, agent: AgentId, at: ClockSnapshot) {
        self.events.push(RestEvent::Completed { agent, at });
    }

    fn on_rest_cancelled(&mut self, agent: AgentId, at: ClockSnapshot) {
        self.events.push(RestEvent::Cancelled { agent, at });
    }

    fn on_eligibility_lost(&mut self, agent: AgentId, at: ClockSnapshot) {
        self.events.push(RestEvent::EligibilityLost { agent, at });
    }
}
