//! Simulation time model.
//!
//! # Design
//!
//! The host world keeps two integer tick counters:
//!
//! - **game tick** counts ticks since the current session started.  It is
//!   reset whenever a saved world is loaded into a new session.
//! - **absolute tick** counts ticks since the world was created.  It never
//!   resets and is strictly increasing over the whole lifetime of a world:
//!
//!   absolute_tick = game_start_abs_tick + game_tick
//!
//! Both are stored as `i64`.  A long-lived world can plausibly outgrow an
//! `i32` counter (2^31 ticks is under 600 in-game days at 60,000 ticks/day),
//! so narrowing either counter is never acceptable.
//!
//! Calendar arithmetic lives in [`crate::calendar`]; this module only owns
//! the counters, the fixed tick lengths, and the [`Clock`] seam that the
//! scheduler reads through.

use std::fmt;

// ── Fixed lengths ─────────────────────────────────────────────────────────────

/// Ticks in one in-game hour.
pub const TICKS_PER_HOUR: i64 = 2_500;

/// Ticks in one in-game day (24 hours).
pub const TICKS_PER_DAY: i64 = 24 * TICKS_PER_HOUR;

/// Half a day.  The largest possible local-time offset from longitude.
pub const TICKS_PER_HALF_DAY: i64 = TICKS_PER_DAY / 2;

/// Days in one calendar period.
pub const DAYS_PER_PERIOD: i64 = 5;

/// Calendar periods in one year.
pub const PERIODS_PER_YEAR: i64 = 12;

/// Days in one year.
pub const DAYS_PER_YEAR: i64 = DAYS_PER_PERIOD * PERIODS_PER_YEAR;

/// Ticks in one calendar period (5 days).
pub const TICKS_PER_PERIOD: i64 = DAYS_PER_PERIOD * TICKS_PER_DAY;

/// Ticks in one year (60 days).
pub const TICKS_PER_YEAR: i64 = DAYS_PER_YEAR * TICKS_PER_DAY;

// ── Tick counters ─────────────────────────────────────────────────────────────

/// Session-relative tick counter.  Resets when a world is reloaded.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameTick(pub i64);

/// World-lifetime tick counter.  Never reset, never decreases.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbsTick(pub i64);

impl GameTick {
    pub const ZERO: GameTick = GameTick(0);

    /// Return the tick `n` steps after `self`, saturating at `i64::MAX`.
    #[inline]
    pub fn offset(self, n: i64) -> GameTick {
        GameTick(self.0.saturating_add(n))
    }
}

impl AbsTick {
    pub const ZERO: AbsTick = AbsTick(0);

    /// Sentinel meaning "this never happened".
    ///
    /// Used as the default completion stamp for agents that have never
    /// finished a deep rest.  Every real absolute tick compares greater.
    pub const NEVER: AbsTick = AbsTick(-1);

    /// `true` unless `self` is the [`NEVER`](Self::NEVER) sentinel.
    #[inline]
    pub fn is_set(self) -> bool {
        self != Self::NEVER
    }

    /// Return the tick `n` steps after `self`, saturating at the `i64` range.
    #[inline]
    pub fn offset(self, n: i64) -> AbsTick {
        AbsTick(self.0.saturating_add(n))
    }

    /// Ticks elapsed from `earlier` to `self` (negative if `earlier` is later).
    #[inline]
    pub fn since(self, earlier: AbsTick) -> i64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<i64> for AbsTick {
    type Output = AbsTick;
    #[inline]
    fn add(self, rhs: i64) -> AbsTick {
        self.offset(rhs)
    }
}

impl std::ops::Sub<i64> for AbsTick {
    type Output = AbsTick;
    #[inline]
    fn sub(self, rhs: i64) -> AbsTick {
        AbsTick(self.0.saturating_sub(rhs))
    }
}

impl std::ops::Add<i64> for GameTick {
    type Output = GameTick;
    #[inline]
    fn add(self, rhs: i64) -> GameTick {
        self.offset(rhs)
    }
}

impl fmt::Display for GameTick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G{}", self.0)
    }
}

impl fmt::Display for AbsTick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_set() {
            write!(f, "A{}", self.0)
        } else {
            f.write_str("never")
        }
    }
}

// ── Clock ─────────────────────────────────────────────────────────────────────

/// Read-only view of the host's two tick counters.
///
/// The scheduler consults a `Clock` but never advances it.  Implementations
/// must return a consistent pair for the duration of one evaluation batch.
pub trait Clock {
    /// Session-relative tick.
    fn game_tick(&self) -> GameTick;

    /// World-lifetime tick.
    fn absolute_tick(&self) -> AbsTick;

    /// Freeze both counters into a `Copy` value that can be shared across
    /// worker threads.
    #[inline]
    fn snapshot(&self) -> ClockSnapshot {
        ClockSnapshot {
            game:     self.game_tick(),
            absolute: self.absolute_tick(),
        }
    }
}

/// Immutable pair of tick counters taken at one instant.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClockSnapshot {
    pub game:     GameTick,
    pub absolute: AbsTick,
}

impl ClockSnapshot {
    /// A snapshot whose game tick equals its absolute tick.  Handy in tests
    /// and for worlds whose first session started at absolute tick 0.
    pub fn at(absolute: AbsTick) -> Self {
        Self { game: GameTick(absolute.0), absolute }
    }
}

impl Clock for ClockSnapshot {
    #[inline]
    fn game_tick(&self) -> GameTick {
        self.game
    }

    #[inline]
    fn absolute_tick(&self) -> AbsTick {
        self.absolute
    }

    #[inline]
    fn snapshot(&self) -> ClockSnapshot {
        *self
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The host-owned tick source.
///
/// `SimClock` is cheap to copy and intentionally holds no heap data.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Absolute tick at which the current session's game tick 0 falls.
    pub game_start_abs_tick: AbsTick,
    /// The current game tick, advanced by `SimClock::advance()`.
    pub current_game_tick: GameTick,
}

impl SimClock {
    /// Start a new session whose game tick 0 is `game_start_abs_tick`.
    pub fn new(game_start_abs_tick: AbsTick) -> Self {
        Self {
            game_start_abs_tick,
            current_game_tick: GameTick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_game_tick = self.current_game_tick.offset(1);
    }

    /// Advance the clock by `n` ticks.
    #[inline]
    pub fn advance_by(&mut self, n: i64) {
        self.current_game_tick = self.current_game_tick.offset(n);
    }

    /// Begin a fresh session at the current absolute tick, as a host does
    /// when it loads a saved world.  The absolute tick is unchanged; the game
    /// tick restarts at zero.
    pub fn restart_session(&mut self) {
        self.game_start_abs_tick = self.absolute_tick();
        self.current_game_tick = GameTick::ZERO;
    }

    /// Break elapsed world time into (year, day-of-year, hour) from absolute
    /// tick 0, ignoring longitude.  Useful for human-readable logging.
    pub fn absolute_ydh(&self) -> (i64, i64, i64) {
        let abs = self.absolute_tick().0;
        let year = abs.div_euclid(TICKS_PER_YEAR);
        let day = abs.div_euclid(TICKS_PER_DAY).rem_euclid(DAYS_PER_YEAR);
        let hour = abs.rem_euclid(TICKS_PER_DAY) / TICKS_PER_HOUR;
        (year, day, hour)
    }
}

impl Clock for SimClock {
    #[inline]
    fn game_tick(&self) -> GameTick {
        self.current_game_tick
    }

    #[inline]
    fn absolute_tick(&self) -> AbsTick {
        self.game_start_abs_tick.offset(self.current_game_tick.0)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (y, d, h) = self.absolute_ydh();
        write!(
            f,
            "{} / {} (year {} day {} {:02}h)",
            self.game_tick(),
            self.absolute_tick(),
            y,
            d,
            h
        )
    }
}
