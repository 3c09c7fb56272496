//! Fluent builder for constructing a [`RestSim`].

use dr_core::{AbsTick, SimClock};
use dr_schedule::{AgentRestState, ScheduleEvaluator};
use tracing::warn;

use crate::{Colony, RestRoster, RestSim, SimConfig, SimError, SimResult};

/// Fluent builder for [`RestSim`].
///
/// # Optional inputs (have defaults)
///
/// | Method        | Default                               |
/// |---------------|---------------------------------------|
/// | `.roster(r)`  | Every agent `Manual`, never rested    |
///
/// # Example
///
/// ```rust,ignore
/// let colony = ColonyBuilder::new(n).longitudes(lons).build()?;
/// let mut sim = SimBuilder::new(config, colony)
///     .roster(RestRoster::load_csv(&path, n)?)
///     .build()?;
/// sim.run(&mut TracingObserver::default())?;
/// ```
pub struct SimBuilder {
    config: SimConfig,
    colony: Colony,
    roster: Option<RestRoster>,
}

impl SimBuilder {
    pub fn new(config: SimConfig, colony: Colony) -> Self {
        Self { config, colony, roster: None }
    }

    /// Supply saved or pre-configured rest state (length `agent_count`).
    pub fn roster(mut self, roster: RestRoster) -> Self {
        self.roster = Some(roster);
        self
    }

    /// Validate inputs and return a ready-to-run [`RestSim`].
    pub fn build(self) -> SimResult<RestSim> {
        self.config.validate()?;
        let agent_count = self.colony.count;

        let mut roster = match self.roster {
            Some(r) => {
                if r.len() != agent_count {
                    return Err(SimError::AgentCountMismatch {
                        expected: agent_count,
                        got:      r.len(),
                        what:     "rest roster",
                    });
                }
                r
            }
            None => RestRoster::new(agent_count),
        };

        // A completion stamp can never lie in the future of the clock.
        let start = self.config.game_start_abs_tick;
        for agent in self.colony.agent_ids() {
            let state = roster.get_mut(agent)?;
            if state.mode().is_dev_only() && !self.config.dev_mode {
                warn!(%agent, mode = %state.mode(), "developer-only mode loaded without dev_mode");
            }
            if state.last_completion_tick() > start {
                warn!(
                    %agent,
                    last_completion = %state.last_completion_tick(),
                    %start,
                    "deep-rest completion after the session start, treating as never rested"
                );
                *state = AgentRestState::restore(state.mode(), AbsTick::NEVER.0);
            }
        }

        let mut colony = self.colony;
        colony.full_cycle_ticks = self.config.evaluator.full_cycle_ticks;
        let last_eligible = colony.eligible.clone();

        Ok(RestSim {
            clock:     SimClock::new(start),
            evaluator: ScheduleEvaluator::new(self.config.evaluator),
            config:    self.config,
            colony,
            roster,
            resting:   Default::default(),
            last_eligible,
        })
    }
}
