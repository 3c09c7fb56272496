//! colony — a small settlement spread across every time zone.
//!
//! Agents are scattered over the planet's longitudes with a mix of schedule
//! modes.  The demo simulates one year, logs every rest transition, saves the
//! roster to CSV, then resumes from the save in a fresh session whose game
//! tick starts again at zero.  Only the completion stamps carried over in the
//! CSV decide who rests next.
//!
//! Set `RUST_LOG=debug` to see individual rest starts and completions.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dr_core::{AbsTick, AgentId, Clock, ClockSnapshot, TICKS_PER_PERIOD, TICKS_PER_YEAR};
use dr_schedule::{AgentRestState, RestDecision, ScheduleMode};
use dr_sim::{ColonyBuilder, RestRoster, SimBuilder, SimConfig, SimObserver, TracingObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const AGENT_COUNT: usize = 48;
const SEED:        u64   = 42;

// ── Observer ──────────────────────────────────────────────────────────────────

/// Logs a one-line summary at every period boundary and forwards the rest of
/// the events to a [`TracingObserver`].
#[derive(Default)]
struct PeriodSummary {
    inner:         TracingObserver,
    started:       usize,
    completed:     usize,
    started_total: usize,
}

impl SimObserver for PeriodSummary {
    fn on_tick_start(&mut self, now: ClockSnapshot) {
        if now.game.0 > 0 && now.game.0 % TICKS_PER_PERIOD == 0 {
            info!(
                game = now.game.0,
                abs = now.absolute.0,
                started = self.started,
                completed = self.completed,
                "period complete"
            );
            self.started = 0;
            self.completed = 0;
        }
    }

    fn on_rest_started(&mut self, agent: AgentId, reason: RestDecision, now: ClockSnapshot) {
        self.started += 1;
        self.started_total += 1;
        self.inner.on_rest_started(agent, reason, now);
    }

    fn on_rest_completed(&mut self, agent: AgentId, now: ClockSnapshot) {
        self.completed += 1;
        self.inner.on_rest_completed(agent, now);
    }

    fn on_rest_cancelled(&mut self, agent: AgentId, now: ClockSnapshot) {
        self.inner.on_rest_cancelled(agent, now);
    }

    fn on_eligibility_lost(&mut self, agent: AgentId, now: ClockSnapshot) {
        self.inner.on_eligibility_lost(agent, now);
    }

    fn on_sim_end(&mut self, now: ClockSnapshot) {
        self.inner.on_sim_end(now);
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = SimConfig {
        game_start_abs_tick: AbsTick(2 * TICKS_PER_YEAR),
        total_ticks: TICKS_PER_YEAR,
        ..SimConfig::default()
    };
    let selectable: Vec<ScheduleMode> = ScheduleMode::selectable(config.dev_mode).collect();

    // ── Population ────────────────────────────────────────────────────────
    let mut rng = SmallRng::seed_from_u64(SEED);
    let longitudes: Vec<f64> = (0..AGENT_COUNT).map(|_| rng.gen_range(-180.0..=180.0)).collect();
    let fatigue: Vec<i64> = (0..AGENT_COUNT)
        .map(|_| rng.gen_range(0..config.evaluator.full_cycle_ticks))
        .collect();
    let states: Vec<AgentRestState> = (0..AGENT_COUNT)
        .map(|i| AgentRestState::new(selectable[i % selectable.len()]))
        .collect();

    let colony = ColonyBuilder::new(AGENT_COUNT)
        .longitudes(longitudes.clone())
        .fatigue(fatigue)
        .build()?;

    let mut sim = SimBuilder::new(config.clone(), colony)
        .roster(RestRoster::from_states(states))
        .build()?;

    for (agent, state) in sim.roster.iter().take(selectable.len()) {
        info!(%agent, lon = longitudes[agent.index()], mode = %state.mode().label(), "agent");
    }

    // ── First session ─────────────────────────────────────────────────────
    let t0 = Instant::now();
    let mut observer = PeriodSummary::default();
    sim.run(&mut observer)?;
    info!(
        rests = observer.started_total,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "first session done"
    );

    // ── Save, reload, resume ──────────────────────────────────────────────
    let path: PathBuf = std::env::temp_dir().join("deeprest_colony_roster.csv");
    sim.roster.save_csv(&path)?;
    info!(path = %path.display(), "roster saved");

    let resume = sim.clock.absolute_tick();
    let roster = RestRoster::load_csv(&path, AGENT_COUNT)?;
    let colony = ColonyBuilder::new(AGENT_COUNT)
        .longitudes(longitudes)
        .without_need((0..AGENT_COUNT as u32).map(AgentId))
        .build()?;
    let mut resumed = SimBuilder::new(
        SimConfig {
            game_start_abs_tick: resume,
            total_ticks: TICKS_PER_PERIOD,
            ..config
        },
        colony,
    )
    .roster(roster)
    .build()?;

    let mut observer = PeriodSummary::default();
    resumed.run(&mut observer)?;
    info!(
        rests = observer.started_total,
        abs = %resumed.clock.absolute_tick(),
        "resumed session done"
    );

    std::fs::remove_file(&path)?;
    Ok(())
}
