//! Run configuration for the reference host.
//!
//! Loaded from JSON by the application and passed to
//! [`SimBuilder`](crate::SimBuilder).  Every field has a default, so a config
//! file only needs to name what it changes:
//!
//! ```json
//! {
//!   "game_start_abs_tick": 7200000,
//!   "total_ticks": 3600000,
//!   "evaluator": { "window_anchor": "planetary" }
//! }
//! ```

use std::io::Read;
use std::path::Path;

use dr_core::{AbsTick, TICKS_PER_DAY, TICKS_PER_HOUR, TICKS_PER_YEAR};
use dr_schedule::EvaluatorConfig;
use serde::{Deserialize, Serialize};

use crate::{SimError, SimResult};

/// Top-level host configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Absolute tick at which this session's game tick 0 falls.
    pub game_start_abs_tick: AbsTick,

    /// Game ticks to simulate.  One year: 3,600,000.
    pub total_ticks: i64,

    /// Evaluate rest decisions every N game ticks.  Must stay at or below the
    /// shortest standard exhaustion lead (one hour) so no trigger is missed.
    pub eval_interval_ticks: i64,

    /// How long a deep rest occupies an agent once started.
    pub rest_duration_ticks: i64,

    /// Offer developer-only schedule modes in the mode picker.
    pub dev_mode: bool,

    /// Evaluator tunables, shared with the need model.
    pub evaluator: EvaluatorConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            game_start_abs_tick: AbsTick::ZERO,
            total_ticks:         TICKS_PER_YEAR,
            eval_interval_ticks: 250,
            rest_duration_ticks: 4 * TICKS_PER_DAY,
            dev_mode:            false,
            evaluator:           EvaluatorConfig::default(),
        }
    }
}

impl SimConfig {
    /// Parse a JSON document.  Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse JSON from any `Read` source.
    pub fn from_json_reader<R: Read>(reader: R) -> SimResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Parse a JSON file.
    pub fn from_json_path(path: &Path) -> SimResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }

    /// Reject values the tick loop cannot run with.
    pub fn validate(&self) -> SimResult<()> {
        if !(1..=TICKS_PER_HOUR).contains(&self.eval_interval_ticks) {
            return Err(SimError::Config(format!(
                "eval_interval_ticks must be in 1..={TICKS_PER_HOUR}, got {}",
                self.eval_interval_ticks
            )));
        }
        if self.rest_duration_ticks <= 0 {
            return Err(SimError::Config(format!(
                "rest_duration_ticks must be positive, got {}",
                self.rest_duration_ticks
            )));
        }
        if self.total_ticks < 0 {
            return Err(SimError::Config(format!(
                "total_ticks must not be negative, got {}",
                self.total_ticks
            )));
        }
        if self.evaluator.full_cycle_ticks <= 0 {
            return Err(SimError::Config(format!(
                "evaluator.full_cycle_ticks must be positive, got {}",
                self.evaluator.full_cycle_ticks
            )));
        }
        if self.evaluator.safety_lead_ticks < 0 {
            return Err(SimError::Config(format!(
                "evaluator.safety_lead_ticks must not be negative, got {}",
                self.evaluator.safety_lead_ticks
            )));
        }
        if self.eval_interval_ticks > self.evaluator.safety_lead_ticks {
            return Err(SimError::Config(format!(
                "eval_interval_ticks ({}) must not exceed evaluator.safety_lead_ticks ({})",
                self.eval_interval_ticks, self.evaluator.safety_lead_ticks
            )));
        }
        if self.game_start_abs_tick.0 < 0 {
            return Err(SimError::Config(format!(
                "game_start_abs_tick must not be negative, got {}",
                self.game_start_abs_tick
            )));
        }
        Ok(())
    }
}
