//! `DeepRestNeed` — the host's exhaustion counter.
//!
//! The need is kept as whole ticks of accumulated fatigue rather than a
//! floating-point level, so a run is exact and reproducible no matter how many
//! ticks it spans.  The level the evaluator reads is derived on demand:
//!
//! ```text
//! level = fatigue_ticks / full_cycle_ticks        (0.0 rested … 1.0 exhausted)
//! ```

/// Per-agent fatigue, in ticks awake since the last full rest.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct DeepRestNeed {
    fatigue_ticks: i64,
}

impl DeepRestNeed {
    /// A need that already carries `fatigue_ticks` of fatigue.  Negative
    /// values are clamped to zero.
    pub fn with_fatigue(fatigue_ticks: i64) -> Self {
        Self { fatigue_ticks: fatigue_ticks.max(0) }
    }

    #[inline]
    pub fn fatigue_ticks(&self) -> i64 {
        self.fatigue_ticks
    }

    /// Fraction of the way to exhaustion, clamped to `[0, 1]`.
    #[inline]
    pub fn level(&self, full_cycle_ticks: i64) -> f64 {
        if full_cycle_ticks <= 0 {
            return 1.0;
        }
        (self.fatigue_ticks as f64 / full_cycle_ticks as f64).clamp(0.0, 1.0)
    }

    /// Add `ticks` of wakefulness.  Fatigue stops growing at the full cycle.
    #[inline]
    pub fn accumulate(&mut self, ticks: i64, full_cycle_ticks: i64) {
        self.fatigue_ticks = self.fatigue_ticks.saturating_add(ticks).min(full_cycle_ticks.max(0));
    }

    /// Drain fatigue while resting so that a full cycle clears in
    /// `rest_duration_ticks`.
    pub fn recover(&mut self, ticks: i64, full_cycle_ticks: i64, rest_duration_ticks: i64) {
        if rest_duration_ticks <= 0 {
            self.reset();
            return;
        }
        // Rounded up so a rest of exactly `rest_duration_ticks` always ends at zero.
        let full = full_cycle_ticks.max(0);
        let per_tick = full / rest_duration_ticks + i64::from(full % rest_duration_ticks != 0);
        self.fatigue_ticks = self
            .fatigue_ticks
            .saturating_sub(per_tick.saturating_mul(ticks))
            .max(0);
    }

    /// Fully rested.
    #[inline]
    pub fn reset(&mut self) {
        self.fatigue_ticks = 0;
    }
}
