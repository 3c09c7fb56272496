//! The `RestSim` struct and its tick loop.

use dr_core::{AbsTick, AgentId, Clock, ClockSnapshot, SimClock};
use dr_schedule::{RestDecision, ScheduleEvaluator, ScheduleMode};
use tracing::{info, trace};

use crate::{Colony, RestRoster, SimConfig, SimError, SimObserver, SimResult};

/// Active-rest index.
#[cfg(feature = "fx-hash")]
pub type RestMap = rustc_hash::FxHashMap<AgentId, RestJob>;
/// Active-rest index.
#[cfg(not(feature = "fx-hash"))]
pub type RestMap = std::collections::HashMap<AgentId, RestJob>;

/// A deep rest in progress.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct RestJob {
    pub started: AbsTick,
    pub ends:    AbsTick,
    pub reason:  RestDecision,
}

// ── RestSim ───────────────────────────────────────────────────────────────────

/// The reference host: owns the clock, the agents and their rest state, and
/// drives the five-phase tick loop described in the crate docs.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
#[derive(Debug)]
pub struct RestSim {
    pub config: SimConfig,

    /// Game and absolute tick counters.
    pub clock: SimClock,

    /// Agent longitudes, needs and eligibility.
    pub colony: Colony,

    /// Scheduler-owned state for every agent.
    pub roster: RestRoster,

    pub evaluator: ScheduleEvaluator,

    /// Agents currently resting, keyed by id.
    pub resting: RestMap,

    /// Eligibility as last seen by the loop, to detect loss.
    pub(crate) last_eligible: Vec<bool>,
}

impl RestSim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run until the clock reaches `config.total_ticks`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        info!(
            agents = self.colony.count,
            start = %self.clock.absolute_tick(),
            total_ticks = self.config.total_ticks,
            "deep-rest simulation starting"
        );
        while self.clock.game_tick().0 < self.config.total_ticks {
            self.step(observer)?;
        }
        observer.on_sim_end(self.clock.snapshot());
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores
    /// `total_ticks`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: i64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Modes the player may pick from in this session.
    pub fn selectable_modes(&self) -> Vec<ScheduleMode> {
        ScheduleMode::selectable(self.config.dev_mode).collect()
    }

    /// Currently selected mode of `agent`.
    pub fn mode(&self, agent: AgentId) -> SimResult<ScheduleMode> {
        Ok(self.roster.get(agent)?.mode())
    }

    /// Select a mode for `agent`.  Developer-only modes are refused unless
    /// `config.dev_mode` is set.
    pub fn set_mode(&mut self, agent: AgentId, mode: ScheduleMode) -> SimResult<()> {
        if mode.is_dev_only() && !self.config.dev_mode {
            return Err(SimError::Config(format!(
                "mode {mode} is only available with dev_mode enabled"
            )));
        }
        self.roster.set_mode(agent, mode)?;
        Ok(())
    }

    /// Grant or revoke autonomous deep rest for `agent`.  A revocation takes
    /// effect at the start of the next tick.
    pub fn set_eligible(&mut self, agent: AgentId, eligible: bool) -> SimResult<()> {
        self.colony.check(agent)?;
        self.colony.eligible[agent.index()] = eligible;
        Ok(())
    }

    /// Move `agent` to a new longitude.
    pub fn set_longitude(&mut self, agent: AgentId, longitude: f64) -> SimResult<()> {
        self.colony.check(agent)?;
        self.colony.longitude[agent.index()] = longitude;
        Ok(())
    }

    pub fn is_resting(&self, agent: AgentId) -> bool {
        self.resting.contains_key(&agent)
    }

    /// What the evaluator would decide for `agent` at the current tick.
    pub fn decision(&self, agent: AgentId) -> SimResult<RestDecision> {
        self.colony.check(agent)?;
        let state = self.roster.get(agent)?;
        Ok(self.evaluator.evaluate_agent(state, &self.colony.view(agent), &self.clock))
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.snapshot();
        observer.on_tick_start(now);
        let started = self.process_tick(now, observer)?;
        observer.on_tick_end(now, started);
        self.clock.advance();
        Ok(())
    }

    fn process_tick<O: SimObserver>(
        &mut self,
        now:      ClockSnapshot,
        observer: &mut O,
    ) -> SimResult<usize> {
        // ── Phase 1: eligibility loss ─────────────────────────────────────
        for i in 0..self.colony.count {
            let eligible = self.colony.eligible[i];
            if self.last_eligible[i] && !eligible {
                let agent = AgentId(i as u32);
                self.roster.get_mut(agent)?.notify_eligibility_lost();
                if self.resting.remove(&agent).is_some() {
                    observer.on_rest_cancelled(agent, now);
                }
                observer.on_eligibility_lost(agent, now);
            }
            self.last_eligible[i] = eligible;
        }

        // ── Phase 2: completions ──────────────────────────────────────────
        //
        // Sorted so that observers see completions in ascending AgentId
        // order regardless of map iteration order.
        let mut finished: Vec<AgentId> = self
            .resting
            .iter()
            .filter(|(_, job)| job.ends <= now.absolute)
            .map(|(&agent, _)| agent)
            .collect();
        finished.sort_unstable();
        for agent in finished {
            self.resting.remove(&agent);
            self.roster.get_mut(agent)?.notify_rest_completed(&now);
            if let Some(need) = self.colony.need[agent.index()].as_mut() {
                need.reset();
            }
            observer.on_rest_completed(agent, now);
        }

        // ── Phase 3: need model ───────────────────────────────────────────
        let full_cycle = self.colony.full_cycle_ticks;
        let rest_duration = self.config.rest_duration_ticks;
        for (i, slot) in self.colony.need.iter_mut().enumerate() {
            let Some(need) = slot.as_mut() else { continue };
            if self.resting.contains_key(&AgentId(i as u32)) {
                need.recover(1, full_cycle, rest_duration);
            } else {
                need.accumulate(1, full_cycle);
            }
        }

        // ── Phase 4: evaluation (read-only) ───────────────────────────────
        if now.game.0.rem_euclid(self.config.eval_interval_ticks) != 0 {
            return Ok(0);
        }
        let triggers = self.evaluate(now);

        // ── Phase 5: apply, ascending AgentId ─────────────────────────────
        let started = triggers.len();
        for (agent, reason) in triggers {
            trace!(%agent, %reason, abs = now.absolute.0, "rest triggered");
            self.resting.insert(
                agent,
                RestJob {
                    started: now.absolute,
                    ends:    now.absolute + rest_duration,
                    reason,
                },
            );
            observer.on_rest_started(agent, reason, now);
        }
        Ok(started)
    }

    /// Evaluate every eligible, idle agent against one frozen clock.
    ///
    /// With the `parallel` Cargo feature the evaluation runs on Rayon's
    /// thread pool.  Results come back in ascending `AgentId` order either
    /// way.
    fn evaluate(&self, now: ClockSnapshot) -> Vec<(AgentId, RestDecision)> {
        let colony    = &self.colony;
        let states    = self.roster.as_slice();
        let evaluator = &self.evaluator;

        let candidates: Vec<AgentId> = colony
            .agent_ids()
            .filter(|a| colony.eligible[a.index()] && !self.resting.contains_key(a))
            .collect();

        let decide = |&agent: &AgentId| {
            let view = colony.view(agent);
            let decision = evaluator.evaluate_agent(&states[agent.index()], &view, &now);
            decision.should_rest().then_some((agent, decision))
        };

        #[cfg(not(feature = "parallel"))]
        {
            candidates.iter().filter_map(decide).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            candidates.par_iter().filter_map(decide).collect()
        }
    }
}
