//! Integration tests for dr-sim.

use dr_core::calendar::period_at;
use dr_core::{
    AbsTick, AgentId, CalendarPeriod, Clock, DrError, GameTick, TICKS_PER_DAY, TICKS_PER_PERIOD,
    TICKS_PER_YEAR,
};
use dr_schedule::{AgentRestState, EvaluatorConfig, RestDecision, ScheduleMode};

use crate::{
    ColonyBuilder, DeepRestNeed, NoopObserver, RestEvent, RestLog, RestRoster, RestSim,
    SimBuilder, SimConfig, SimError,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Start of year 2: planet-wide period 1 begins here.
const Y2: i64 = 2 * TICKS_PER_YEAR;

fn config(start: i64, total_ticks: i64) -> SimConfig {
    SimConfig {
        game_start_abs_tick: AbsTick(start),
        total_ticks,
        eval_interval_ticks: 2_500,
        rest_duration_ticks: 4 * TICKS_PER_DAY,
        dev_mode:            false,
        evaluator:           EvaluatorConfig::default(),
    }
}

/// One agent at `lon` with no need, in `mode`, last rested at `last`.
fn calendar_sim(start: i64, total: i64, lon: f64, mode: ScheduleMode, last: i64) -> RestSim {
    let colony = ColonyBuilder::new(1)
        .longitudes(vec![lon])
        .without_need([AgentId(0)])
        .build()
        .unwrap();
    SimBuilder::new(config(start, total), colony)
        .roster(RestRoster::from_states(vec![AgentRestState::restore(mode, last)]))
        .build()
        .unwrap()
}

fn game_ticks(starts: &[dr_core::ClockSnapshot]) -> Vec<i64> {
    starts.iter().map(|s| s.game.0).collect()
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn partial_json_takes_defaults() {
        let cfg = SimConfig::from_json_str(r#"{ "game_start_abs_tick": 7200000, "dev_mode": true }"#)
            .unwrap();
        assert_eq!(cfg.game_start_abs_tick, AbsTick(7_200_000));
        assert!(cfg.dev_mode);
        assert_eq!(cfg.eval_interval_ticks, SimConfig::default().eval_interval_ticks);
        assert_eq!(cfg.evaluator, EvaluatorConfig::default());
        cfg.validate().unwrap();
    }

    #[test]
    fn nested_evaluator_config_parses() {
        let cfg = SimConfig::from_json_str(
            r#"{ "evaluator": { "full_cycle_ticks": 240000, "window_anchor": "agent_local" } }"#,
        )
        .unwrap();
        assert_eq!(cfg.evaluator.full_cycle_ticks, 240_000);
        assert_eq!(cfg.evaluator.window_anchor, dr_schedule::WindowAnchor::AgentLocal);
        assert_eq!(cfg.evaluator.safety_lead_ticks, TICKS_PER_DAY);
    }

    #[test]
    fn unknown_anchor_is_a_json_error() {
        let err = SimConfig::from_json_str(r#"{ "evaluator": { "window_anchor": "lunar" } }"#)
            .unwrap_err();
        assert!(matches!(err, SimError::Json(_)));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let bad = [
            SimConfig { eval_interval_ticks: 0, ..SimConfig::default() },
            SimConfig { eval_interval_ticks: 2_501, ..SimConfig::default() },
            SimConfig { rest_duration_ticks: 0, ..SimConfig::default() },
            SimConfig { total_ticks: -1, ..SimConfig::default() },
            SimConfig {
                evaluator: EvaluatorConfig { full_cycle_ticks: 0, ..EvaluatorConfig::default() },
                ..SimConfig::default()
            },
        ];
        for cfg in bad {
            assert!(matches!(cfg.validate(), Err(SimError::Config(_))), "{cfg:?}");
        }
        SimConfig { eval_interval_ticks: 2_500, ..SimConfig::default() }.validate().unwrap();
    }

    #[test]
    fn validate_rejects_interval_longer_than_safety_lead() {
        let mut cfg = SimConfig { eval_interval_ticks: 2_500, ..SimConfig::default() };
        cfg.evaluator.safety_lead_ticks = 2_499;
        assert!(matches!(cfg.validate(), Err(SimError::Config(_))));

        cfg.evaluator.safety_lead_ticks = 2_500;
        cfg.validate().unwrap();
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.json");
        std::fs::write(&path, r#"{ "total_ticks": 1000, "eval_interval_ticks": 100 }"#).unwrap();
        let cfg = SimConfig::from_json_path(&path).unwrap();
        assert_eq!(cfg.total_ticks, 1_000);
        assert_eq!(cfg.eval_interval_ticks, 100);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SimConfig::from_json_path(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SimError::Io(_)));
    }
}

// ── Builders ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_with_default_roster() {
        let colony = ColonyBuilder::new(3).build().unwrap();
        let sim = SimBuilder::new(SimConfig::default(), colony).build().unwrap();
        assert_eq!(sim.roster.len(), 3);
        assert!(sim.roster.iter().all(|(_, s)| *s == AgentRestState::default()));
        assert_eq!(sim.clock.game_tick(), GameTick::ZERO);
    }

    #[test]
    fn roster_count_mismatch_errors() {
        let colony = ColonyBuilder::new(3).build().unwrap();
        let err = SimBuilder::new(SimConfig::default(), colony)
            .roster(RestRoster::new(2))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            SimError::AgentCountMismatch { expected: 3, got: 2, what: "rest roster" }
        ));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let colony = ColonyBuilder::new(1).build().unwrap();
        let cfg = SimConfig { eval_interval_ticks: 0, ..SimConfig::default() };
        assert!(matches!(SimBuilder::new(cfg, colony).build(), Err(SimError::Config(_))));
    }

    #[test]
    fn colony_length_mismatch_errors() {
        let err = ColonyBuilder::new(2).longitudes(vec![0.0]).build().unwrap_err();
        assert!(matches!(
            err,
            DrError::LengthMismatch { what: "longitudes", expected: 2, got: 1 }
        ));
    }

    #[test]
    fn without_need_out_of_range_errors() {
        let err = ColonyBuilder::new(2).without_need([AgentId(5)]).build().unwrap_err();
        assert!(matches!(err, DrError::AgentNotFound(AgentId(5))));
    }

    #[test]
    fn future_completion_stamp_loads_as_never() {
        let start = Y2 + 1_000;
        let colony = ColonyBuilder::new(2).without_need([AgentId(0), AgentId(1)]).build().unwrap();
        let states = vec![
            AgentRestState::restore(ScheduleMode::CalendarFirstSeventh, start + 50_000),
            AgentRestState::restore(ScheduleMode::CalendarFirstSeventh, start),
        ];
        let mut sim = SimBuilder::new(config(start, 2_500), colony)
            .roster(RestRoster::from_states(states))
            .build()
            .unwrap();

        let future = sim.roster.get(AgentId(0)).unwrap();
        assert_eq!(future.last_completion_tick(), AbsTick::NEVER);
        assert_eq!(future.mode(), ScheduleMode::CalendarFirstSeventh);
        // A stamp equal to the start tick is a real completion and survives.
        assert_eq!(sim.roster.get(AgentId(1)).unwrap().last_completion_tick(), AbsTick(start));

        let mut log = RestLog::default();
        sim.run(&mut log).unwrap();
        let starts = log.starts_for(AgentId(0));
        assert_eq!(game_ticks(&starts), vec![0]);
        assert!(log.starts_for(AgentId(1)).is_empty());
    }

    #[test]
    fn built_sim_is_debug_printable() {
        let colony = ColonyBuilder::new(1).build().unwrap();
        let sim = SimBuilder::new(SimConfig::default(), colony).build().unwrap();
        assert!(format!("{sim:?}").contains("RestSim"));
    }

    #[test]
    fn colony_takes_full_cycle_from_config() {
        let colony = ColonyBuilder::new(1).fatigue(vec![60_000]).build().unwrap();
        let mut cfg = SimConfig::default();
        cfg.evaluator.full_cycle_ticks = 240_000;
        let sim = SimBuilder::new(cfg, colony).build().unwrap();
        assert_eq!(sim.colony.exhaustion_level(AgentId(0)), Some(0.25));
    }
}

// ── Need model ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod need_tests {
    use super::*;

    #[test]
    fn accumulate_caps_at_full_cycle() {
        let mut need = DeepRestNeed::default();
        need.accumulate(150, 100);
        assert_eq!(need.fatigue_ticks(), 100);
        assert_eq!(need.level(100), 1.0);
    }

    #[test]
    fn recover_clears_a_full_cycle_in_rest_duration() {
        let mut need = DeepRestNeed::with_fatigue(900);
        need.recover(299, 900, 300);
        assert_eq!(need.fatigue_ticks(), 3);
        need.recover(1, 900, 300);
        assert_eq!(need.fatigue_ticks(), 0);
    }

    #[test]
    fn recover_with_extreme_lengths_does_not_overflow() {
        let mut need = DeepRestNeed::with_fatigue(i64::MAX);
        need.recover(1, i64::MAX, i64::MAX);
        assert_eq!(need.fatigue_ticks(), i64::MAX - 1);
        need.recover(i64::MAX, i64::MAX, 1);
        assert_eq!(need.fatigue_ticks(), 0);
    }

    #[test]
    fn validated_extreme_config_runs() {
        let colony = ColonyBuilder::new(1).fatigue(vec![10_000]).build().unwrap();
        let mut cfg = config(Y2, 5_000);
        cfg.rest_duration_ticks = i64::MAX;
        cfg.evaluator.full_cycle_ticks = i64::MAX;
        cfg.validate().unwrap();
        let mut sim = SimBuilder::new(cfg, colony)
            .roster(RestRoster::with_mode(1, ScheduleMode::CalendarFirstSeventh))
            .build()
            .unwrap();
        sim.run(&mut NoopObserver).unwrap();
        assert!(sim.is_resting(AgentId(0)));
        assert_eq!(sim.colony.need[0].unwrap().fatigue_ticks(), 10_001 - 4_999);
    }

    #[test]
    fn negative_fatigue_clamps() {
        assert_eq!(DeepRestNeed::with_fatigue(-5).fatigue_ticks(), 0);
        assert_eq!(DeepRestNeed::default().level(0), 1.0);
    }
}

// ── Host API ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod api_tests {
    use super::*;

    #[test]
    fn selectable_modes_follow_dev_mode() {
        let colony = ColonyBuilder::new(1).build().unwrap();
        let sim = SimBuilder::new(SimConfig::default(), colony.clone()).build().unwrap();
        let modes = sim.selectable_modes();
        assert_eq!(modes.len(), ScheduleMode::ALL.len() - 2);
        assert!(modes.iter().all(|m| !m.is_dev_only()));

        let cfg = SimConfig { dev_mode: true, ..SimConfig::default() };
        let sim = SimBuilder::new(cfg, colony).build().unwrap();
        assert_eq!(sim.selectable_modes().len(), ScheduleMode::ALL.len());
    }

    #[test]
    fn dev_modes_need_dev_mode() {
        let colony = ColonyBuilder::new(1).build().unwrap();
        let mut sim = SimBuilder::new(SimConfig::default(), colony).build().unwrap();
        let err = sim.set_mode(AgentId(0), ScheduleMode::DevExhaustionOneTick).unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
        assert_eq!(sim.mode(AgentId(0)).unwrap(), ScheduleMode::Manual);

        sim.config.dev_mode = true;
        sim.set_mode(AgentId(0), ScheduleMode::DevExhaustionOneTick).unwrap();
        assert_eq!(sim.mode(AgentId(0)).unwrap(), ScheduleMode::DevExhaustionOneTick);
    }

    #[test]
    fn unknown_agent_errors() {
        let colony = ColonyBuilder::new(2).build().unwrap();
        let mut sim = SimBuilder::new(SimConfig::default(), colony).build().unwrap();
        let ghost = AgentId(9);
        assert!(matches!(sim.mode(ghost), Err(SimError::UnknownAgent(AgentId(9)))));
        assert!(matches!(
            sim.set_mode(ghost, ScheduleMode::ExhaustionOneDay),
            Err(SimError::UnknownAgent(_))
        ));
        assert!(matches!(sim.set_eligible(ghost, false), Err(SimError::UnknownAgent(_))));
        assert!(matches!(sim.set_longitude(ghost, 10.0), Err(SimError::UnknownAgent(_))));
        assert!(matches!(sim.decision(ghost), Err(SimError::UnknownAgent(_))));
    }

    #[test]
    fn manual_agents_never_rest() {
        let colony = ColonyBuilder::new(4)
            .fatigue(vec![dr_schedule::FULL_CYCLE_TICKS; 4])
            .build()
            .unwrap();
        let mut sim = SimBuilder::new(config(Y2, 3 * TICKS_PER_PERIOD), colony).build().unwrap();
        let mut log = RestLog::default();
        sim.run(&mut log).unwrap();
        assert!(log.events.is_empty());
        assert_eq!(sim.decision(AgentId(0)).unwrap(), RestDecision::Manual);
    }
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scenario_tests {
    use super::*;

    /// 4-day exhaustion cycle, 1-day lead, 1-day rest.
    fn exhaustion_sim(with_need: bool) -> RestSim {
        let mut builder = ColonyBuilder::new(1);
        if !with_need {
            builder = builder.without_need([AgentId(0)]);
        }
        let colony = builder.build().unwrap();
        let mut cfg = config(0, 10 * TICKS_PER_DAY);
        cfg.eval_interval_ticks = 250;
        cfg.rest_duration_ticks = TICKS_PER_DAY;
        cfg.evaluator.full_cycle_ticks = 4 * TICKS_PER_DAY;
        SimBuilder::new(cfg, colony)
            .roster(RestRoster::with_mode(1, ScheduleMode::ExhaustionOneDay))
            .build()
            .unwrap()
    }

    #[test]
    fn exhaustion_mode_rests_one_day_before_exhaustion() {
        let mut sim = exhaustion_sim(true);
        let mut log = RestLog::default();
        sim.run(&mut log).unwrap();

        let starts = log.starts_for(AgentId(0));
        assert_eq!(game_ticks(&starts), vec![180_000, 420_000]);
        assert_eq!(log.count_completed(), 2);
        assert!(matches!(
            log.events[0],
            RestEvent::Started { reason: RestDecision::ExhaustionImminent { .. }, .. }
        ));
        // Completion stamps the absolute tick one rest duration after the start.
        assert_eq!(
            sim.roster.get(AgentId(0)).unwrap().last_completion_tick(),
            AbsTick(420_000 + TICKS_PER_DAY)
        );
    }

    #[test]
    fn exhaustion_mode_without_need_never_rests() {
        let mut sim = exhaustion_sim(false);
        let mut log = RestLog::default();
        sim.run(&mut log).unwrap();
        assert!(log.events.is_empty());
        assert_eq!(sim.decision(AgentId(0)).unwrap(), RestDecision::NotDue);
    }

    #[test]
    fn calendar_rests_once_per_window_occurrence() {
        let mut sim = calendar_sim(Y2, TICKS_PER_YEAR, 0.0, ScheduleMode::CalendarFirstSeventh, -1);
        let mut log = RestLog::default();
        sim.run(&mut log).unwrap();

        let starts = log.starts_for(AgentId(0));
        assert_eq!(game_ticks(&starts), vec![0, 6 * TICKS_PER_PERIOD]);
        assert!(matches!(log.events[0], RestEvent::Started { reason: RestDecision::FirstWindow, .. }));
        let second = log
            .events
            .iter()
            .filter(|e| matches!(e, RestEvent::Started { .. }))
            .nth(1)
            .unwrap();
        assert!(matches!(second, RestEvent::Started { reason: RestDecision::WindowDue { .. }, .. }));
    }

    #[test]
    fn every_time_zone_rests_once_in_its_local_window() {
        let lons: Vec<f64> = vec![-180.0, -90.0, 0.0, 90.0, 180.0];
        let n = lons.len();
        let colony = ColonyBuilder::new(n)
            .longitudes(lons.clone())
            .without_need((0..n as u32).map(AgentId))
            .build()
            .unwrap();
        let states = vec![AgentRestState::restore(ScheduleMode::CalendarFirstSeventh, Y2 + 100_000); n];
        // Planet-wide periods 6 and 7.
        let mut sim = SimBuilder::new(config(Y2 + 5 * TICKS_PER_PERIOD, 2 * TICKS_PER_PERIOD), colony)
            .roster(RestRoster::from_states(states))
            .build()
            .unwrap();
        let mut log = RestLog::default();
        sim.run(&mut log).unwrap();

        for (i, &lon) in lons.iter().enumerate() {
            let starts = log.starts_for(AgentId(i as u32));
            assert_eq!(starts.len(), 1, "lon {lon}");
            assert_eq!(period_at(starts[0].absolute, lon), CalendarPeriod::Seventh, "lon {lon}");
        }
        // Far east enters period 7 half a day early, far west half a day late.
        assert_eq!(log.starts_for(AgentId(4))[0].game, GameTick(TICKS_PER_PERIOD - 30_000));
        assert_eq!(log.starts_for(AgentId(0))[0].game, GameTick(TICKS_PER_PERIOD + 30_000));
        assert_eq!(log.starts_for(AgentId(1))[0].game, GameTick(TICKS_PER_PERIOD + 15_000));
    }

    #[test]
    fn safety_net_interrupts_wait_for_window() {
        let colony = ColonyBuilder::new(1)
            .fatigue(vec![dr_schedule::FULL_CYCLE_TICKS - 1_000])
            .build()
            .unwrap();
        // Period 2: outside the 1/7 window.
        let mut sim = SimBuilder::new(config(Y2 + TICKS_PER_PERIOD, 10_000), colony)
            .roster(RestRoster::with_mode(1, ScheduleMode::CalendarFirstSeventh))
            .build()
            .unwrap();
        let mut log = RestLog::default();
        sim.run(&mut log).unwrap();
        assert!(matches!(
            log.events.as_slice(),
            [RestEvent::Started { reason: RestDecision::ExhaustionImminent { .. }, .. }]
        ));
    }

    #[test]
    fn losing_eligibility_cancels_and_resets() {
        let mut sim = calendar_sim(Y2, TICKS_PER_YEAR, 0.0, ScheduleMode::CalendarFirstSeventh, -1);
        let mut log = RestLog::default();
        sim.run_ticks(2_500, &mut log).unwrap();
        assert!(sim.is_resting(AgentId(0)));

        sim.set_eligible(AgentId(0), false).unwrap();
        sim.run_ticks(1, &mut log).unwrap();
        assert!(!sim.is_resting(AgentId(0)));
        assert_eq!(*sim.roster.get(AgentId(0)).unwrap(), AgentRestState::default());

        sim.set_eligible(AgentId(0), true).unwrap();
        sim.run_ticks(2 * TICKS_PER_PERIOD, &mut log).unwrap();

        let kinds: Vec<_> = log
            .events
            .iter()
            .map(|e| match e {
                RestEvent::Started { .. } => "started",
                RestEvent::Completed { .. } => "completed",
                RestEvent::Cancelled { .. } => "cancelled",
                RestEvent::EligibilityLost { .. } => "lost",
            })
            .collect();
        assert_eq!(kinds, ["started", "cancelled", "lost"]);
        assert_eq!(sim.mode(AgentId(0)).unwrap(), ScheduleMode::Manual);
    }

    #[test]
    fn never_eligible_agent_is_left_alone() {
        let colony = ColonyBuilder::new(1)
            .eligibility(vec![false])
            .fatigue(vec![dr_schedule::FULL_CYCLE_TICKS])
            .build()
            .unwrap();
        let mut sim = SimBuilder::new(config(Y2, TICKS_PER_PERIOD), colony)
            .roster(RestRoster::with_mode(1, ScheduleMode::ExhaustionOneHour))
            .build()
            .unwrap();
        let mut log = RestLog::default();
        sim.run(&mut log).unwrap();
        assert!(log.events.is_empty());
        assert_eq!(sim.decision(AgentId(0)).unwrap(), RestDecision::Ineligible);
        // Never having been eligible is not a loss: the mode survives.
        assert_eq!(sim.mode(AgentId(0)).unwrap(), ScheduleMode::ExhaustionOneHour);
    }

    #[test]
    fn runs_are_deterministic() {
        fn run_once() -> Vec<RestEvent> {
            let n = 40;
            let lons: Vec<f64> = (0..n).map(|i| ((i * 37) % 360) as f64 - 180.0).collect();
            let fatigue: Vec<i64> = (0..n).map(|i| i as i64 * 40_000).collect();
            let colony = ColonyBuilder::new(n).longitudes(lons).fatigue(fatigue).build().unwrap();
            let states: Vec<AgentRestState> = (0..n)
                .map(|i| AgentRestState::new(ScheduleMode::ALL[i % ScheduleMode::ALL.len()]))
                .collect();
            let mut cfg = config(Y2, TICKS_PER_YEAR / 2);
            cfg.dev_mode = true;
            let mut sim = SimBuilder::new(cfg, colony)
                .roster(RestRoster::from_states(states))
                .build()
                .unwrap();
            let mut log = RestLog::default();
            sim.run(&mut log).unwrap();
            log.events
        }

        let a = run_once();
        assert!(!a.is_empty());
        assert_eq!(a, run_once());
    }

    #[test]
    fn saved_roster_does_not_retrigger_after_reload() {
        let mut first = calendar_sim(Y2, 260_000, 0.0, ScheduleMode::CalendarFirstSeventh, -1);
        let mut log = RestLog::default();
        first.run(&mut log).unwrap();
        assert_eq!(log.count_completed(), 1);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.csv");
        first.roster.save_csv(&path).unwrap();

        // New session resumes at the same absolute tick, game tick back at 0.
        let resume = first.clock.absolute_tick();
        let roster = RestRoster::load_csv(&path, 1).unwrap();
        assert_eq!(roster, first.roster);

        let colony = ColonyBuilder::new(1).without_need([AgentId(0)]).build().unwrap();
        let mut second = SimBuilder::new(config(resume.0, 30_000), colony)
            .roster(roster)
            .build()
            .unwrap();
        assert_eq!(second.clock.game_tick(), GameTick::ZERO);
        assert!(matches!(
            second.decision(AgentId(0)).unwrap(),
            RestDecision::AlreadyRested { .. }
        ));

        let mut log = RestLog::default();
        second.run(&mut log).unwrap();
        assert!(log.events.is_empty());
    }

    #[test]
    fn noop_observer_runs_to_total_ticks() {
        let mut sim = calendar_sim(Y2, 5_000, 0.0, ScheduleMode::CalendarFirstSeventh, -1);
        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.clock.game_tick(), GameTick(5_000));
        assert_eq!(sim.clock.absolute_tick(), AbsTick(Y2 + 5_000));
    }
}
