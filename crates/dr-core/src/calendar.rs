//! Calendar model: absolute ticks + longitude → local calendar position.
//!
//! # Model
//!
//! The year is a fixed 60 days split into twelve 5-day [`CalendarPeriod`]s.
//! Every location sees the same absolute tick, but reads it through its own
//! time zone:
//!
//! ```text
//! zone        = round(longitude / 15)            clamped to [-12, 12]
//! offset      = zone * TICKS_PER_HOUR            at most ±half a day
//! local       = absolute + offset
//! day_of_year = floor(local / TICKS_PER_DAY) mod 60
//! period      = day_of_year / 5
//! ```
//!
//! All division is Euclidean, so ticks before the epoch still land on a valid
//! day and period.  Everything here is a pure function of its inputs.

use std::fmt;

use crate::time::{
    AbsTick, DAYS_PER_PERIOD, DAYS_PER_YEAR, TICKS_PER_DAY, TICKS_PER_HOUR, TICKS_PER_PERIOD,
    TICKS_PER_YEAR,
};

// ── CalendarPeriod ────────────────────────────────────────────────────────────

/// One of the twelve fixed-length divisions of the year.
///
/// Periods are compared by identity only.  Nothing in the scheduler treats
/// them as a ring with arithmetic neighbours.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CalendarPeriod {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
    Seventh,
    Eighth,
    Ninth,
    Tenth,
    Eleventh,
    Twelfth,
}

impl CalendarPeriod {
    /// All periods in calendar order.
    pub const ALL: [CalendarPeriod; 12] = [
        CalendarPeriod::First,
        CalendarPeriod::Second,
        CalendarPeriod::Third,
        CalendarPeriod::Fourth,
        CalendarPeriod::Fifth,
        CalendarPeriod::Sixth,
        CalendarPeriod::Seventh,
        CalendarPeriod::Eighth,
        CalendarPeriod::Ninth,
        CalendarPeriod::Tenth,
        CalendarPeriod::Eleventh,
        CalendarPeriod::Twelfth,
    ];

    /// Zero-based position in the year.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`index`](Self::index).  `None` for `idx >= 12`.
    #[inline]
    pub fn from_index(idx: usize) -> Option<CalendarPeriod> {
        Self::ALL.get(idx).copied()
    }

    /// One-based ordinal, as shown to players ("period 7").
    #[inline]
    pub fn ordinal(self) -> u8 {
        self as u8 + 1
    }
}

impl fmt::Display for CalendarPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "period {}", self.ordinal())
    }
}

// ── Longitude → local time ────────────────────────────────────────────────────

/// Whole-hour time zone for a longitude in degrees, clamped to `[-12, 12]`.
///
/// Non-finite longitudes are treated as the prime meridian.
pub fn time_zone_at(longitude: f64) -> i64 {
    if !longitude.is_finite() {
        return 0;
    }
    ((longitude / 15.0).round() as i64).clamp(-12, 12)
}

/// Tick offset between absolute time and local time at `longitude`.
#[inline]
pub fn local_ticks_offset(longitude: f64) -> i64 {
    time_zone_at(longitude) * TICKS_PER_HOUR
}

/// Absolute tick expressed in local time at `longitude`.
#[inline]
pub fn local_ticks(abs: AbsTick, longitude: f64) -> i64 {
    abs.0.saturating_add(local_ticks_offset(longitude))
}

/// Zero-based local day of the year, in `0..60`.
pub fn day_of_year(abs: AbsTick, longitude: f64) -> i64 {
    local_ticks(abs, longitude)
        .div_euclid(TICKS_PER_DAY)
        .rem_euclid(DAYS_PER_YEAR)
}

/// Zero-based local day within the current period, in `0..5`.
pub fn day_of_period(abs: AbsTick, longitude: f64) -> i64 {
    day_of_year(abs, longitude) % DAYS_PER_PERIOD
}

/// Local hour of the day, in `0..24`.
pub fn hour_of_day(abs: AbsTick, longitude: f64) -> i64 {
    local_ticks(abs, longitude).rem_euclid(TICKS_PER_DAY) / TICKS_PER_HOUR
}

/// Zero-based local year index.
pub fn year(abs: AbsTick, longitude: f64) -> i64 {
    local_ticks(abs, longitude).div_euclid(TICKS_PER_YEAR)
}

/// The calendar period in force at `longitude` at absolute tick `abs`.
pub fn period_at(abs: AbsTick, longitude: f64) -> CalendarPeriod {
    let idx = (day_of_year(abs, longitude) / DAYS_PER_PERIOD) as usize;
    // day_of_year is in 0..60, so idx is always in 0..12.
    CalendarPeriod::ALL[idx]
}

/// Start of the period-length bucket containing `abs`, measured on the
/// absolute clock with no longitude applied.
///
/// This is the same instant for every agent on the planet, which makes it a
/// stable reference for "has this agent already rested this period".
pub fn planetary_period_start(abs: AbsTick) -> AbsTick {
    AbsTick(abs.0.div_euclid(TICKS_PER_PERIOD).saturating_mul(TICKS_PER_PERIOD))
}

/// Start of the local period containing `abs` at `longitude`, converted back
/// to absolute ticks.
pub fn local_period_start(abs: AbsTick, longitude: f64) -> AbsTick {
    let offset = local_ticks_offset(longitude);
    let local = abs.0.saturating_add(offset);
    AbsTick(
        local
            .div_euclid(TICKS_PER_PERIOD)
            .saturating_mul(TICKS_PER_PERIOD)
            .saturating_sub(offset),
    )
}
