//! The schedule-mode catalog: every mode a player can pick for an agent.
//!
//! # Disciplines
//!
//! Each [`ScheduleMode`] belongs to exactly one [`Discipline`]:
//!
//! | Discipline   | Fires when                                                  |
//! |--------------|-------------------------------------------------------------|
//! | `Manual`     | never; a player or other policy must act                    |
//! | `Exhaustion` | the agent is within `lead_ticks` of full exhaustion         |
//! | `Calendar`   | the agent's local period is one of a pair of opposite periods, once per occurrence |
//!
//! [`ScheduleMode::discipline`] is a total `match` over the closed enum, so
//! adding a mode without giving it a discipline is a compile error.
//!
//! # Persistence keys
//!
//! Every mode has a stable string key used in save files.  Keys are never
//! renamed; removing a mode leaves old saves readable because
//! [`ScheduleMode::from_key_or_manual`] maps unknown keys to `Manual`.

use std::fmt;

use dr_core::{CalendarPeriod, TICKS_PER_DAY, TICKS_PER_HOUR};
use tracing::warn;

use crate::{ScheduleError, ScheduleResult};

// ── Discipline ────────────────────────────────────────────────────────────────

/// The trigger family a mode belongs to, with its parameters.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Discipline {
    /// Never triggers autonomously.
    Manual,
    /// Triggers when the ticks left before full exhaustion drop to `lead_ticks`.
    Exhaustion { lead_ticks: i64 },
    /// Triggers once per occurrence of either period, with an exhaustion
    /// safety net underneath.
    Calendar { first: CalendarPeriod, second: CalendarPeriod },
}

// ── ScheduleMode ──────────────────────────────────────────────────────────────

/// A selectable deep-rest schedule.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum ScheduleMode {
    /// No autonomous scheduling.
    #[default]
    Manual,

    ExhaustionOneHour,
    ExhaustionThreeHours,
    ExhaustionOneDay,
    ExhaustionThreeDays,

    /// Developer mode: wait until the very last tick.
    DevExhaustionOneTick,
    /// Developer mode: a tenth of an hour of lead.
    DevExhaustion250Ticks,

    CalendarFirstSeventh,
    CalendarSecondEighth,
    CalendarThirdNinth,
    CalendarFourthTenth,
    CalendarFifthEleventh,
    CalendarSixthTwelfth,
}

impl ScheduleMode {
    /// Every mode, in the order a mode picker lists them.
    pub const ALL: [ScheduleMode; 13] = [
        ScheduleMode::Manual,
        ScheduleMode::DevExhaustionOneTick,
        ScheduleMode::DevExhaustion250Ticks,
        ScheduleMode::ExhaustionOneHour,
        ScheduleMode::ExhaustionThreeHours,
        ScheduleMode::ExhaustionOneDay,
        ScheduleMode::ExhaustionThreeDays,
        ScheduleMode::CalendarFirstSeventh,
        ScheduleMode::CalendarSecondEighth,
        ScheduleMode::CalendarThirdNinth,
        ScheduleMode::CalendarFourthTenth,
        ScheduleMode::CalendarFifthEleventh,
        ScheduleMode::CalendarSixthTwelfth,
    ];

    /// The discipline and parameters this mode schedules with.
    pub fn discipline(self) -> Discipline {
        use CalendarPeriod::*;
        use ScheduleMode as M;

        let calendar = |first, second| Discipline::Calendar { first, second };
        let exhaustion = |lead_ticks| Discipline::Exhaustion { lead_ticks };

        match self {
            M::Manual                => Discipline::Manual,
            M::ExhaustionOneHour     => exhaustion(TICKS_PER_HOUR),
            M::ExhaustionThreeHours  => exhaustion(3 * TICKS_PER_HOUR),
            M::ExhaustionOneDay      => exhaustion(TICKS_PER_DAY),
            M::ExhaustionThreeDays   => exhaustion(3 * TICKS_PER_DAY),
            M::DevExhaustionOneTick  => exhaustion(1),
            M::DevExhaustion250Ticks => exhaustion(250),
            M::CalendarFirstSeventh  => calendar(First, Seventh),
            M::CalendarSecondEighth  => calendar(Second, Eighth),
            M::CalendarThirdNinth    => calendar(Third, Ninth),
            M::CalendarFourthTenth   => calendar(Fourth, Tenth),
            M::CalendarFifthEleventh => calendar(Fifth, Eleventh),
            M::CalendarSixthTwelfth  => calendar(Sixth, Twelfth),
        }
    }

    /// `true` for modes that only appear in the picker with developer mode on.
    pub fn is_dev_only(self) -> bool {
        matches!(
            self,
            ScheduleMode::DevExhaustionOneTick | ScheduleMode::DevExhaustion250Ticks
        )
    }

    /// The modes a player may choose from.
    ///
    /// Developer modes are included only when `dev_mode` is set.
    pub fn selectable(dev_mode: bool) -> impl Iterator<Item = ScheduleMode> {
        Self::ALL
            .into_iter()
            .filter(move |m| dev_mode || !m.is_dev_only())
    }

    /// Stable save-file key.
    pub fn key(self) -> &'static str {
        match self {
            ScheduleMode::Manual                => "manual",
            ScheduleMode::ExhaustionOneHour     => "exhaustion_1h",
            ScheduleMode::ExhaustionThreeHours  => "exhaustion_3h",
            ScheduleMode::ExhaustionOneDay      => "exhaustion_1d",
            ScheduleMode::ExhaustionThreeDays   => "exhaustion_3d",
            ScheduleMode::DevExhaustionOneTick  => "exhaustion_1t",
            ScheduleMode::DevExhaustion250Ticks => "exhaustion_250t",
            ScheduleMode::CalendarFirstSeventh  => "calendar_1_7",
            ScheduleMode::CalendarSecondEighth  => "calendar_2_8",
            ScheduleMode::CalendarThirdNinth    => "calendar_3_9",
            ScheduleMode::CalendarFourthTenth   => "calendar_4_10",
            ScheduleMode::CalendarFifthEleventh => "calendar_5_11",
            ScheduleMode::CalendarSixthTwelfth  => "calendar_6_12",
        }
    }

    /// Parse a save-file key.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::InvalidMode`] if `key` names no known mode.
    pub fn from_key(key: &str) -> ScheduleResult<ScheduleMode> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.key() == key)
            .ok_or_else(|| ScheduleError::InvalidMode(key.to_string()))
    }

    /// Parse a save-file key, recovering unknown keys as `Manual`.
    ///
    /// This is the load path: a mode removed by a newer version must not make
    /// an old save unreadable.
    pub fn from_key_or_manual(key: &str) -> ScheduleMode {
        Self::from_key(key).unwrap_or_else(|err| {
            warn!(%err, "unrecognized deep-rest mode in save data, falling back to manual");
            ScheduleMode::Manual
        })
    }

    /// Player-facing description.
    pub fn label(self) -> String {
        match self.discipline() {
            Discipline::Manual => "Manual".to_string(),
            Discipline::Exhaustion { lead_ticks } => {
                format!("When {} from exhaustion", describe_ticks(lead_ticks))
            }
            Discipline::Calendar { first, second } => {
                format!("Each {first} and {second}")
            }
        }
    }
}

impl fmt::Display for ScheduleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl serde::Serialize for ScheduleMode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> serde::Deserialize<'de> for ScheduleMode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Ok(ScheduleMode::from_key_or_manual(&key))
    }
}

/// "1 day", "3 hours", "250 ticks".
fn describe_ticks(ticks: i64) -> String {
    let plural = |n: i64, unit: &str| {
        if n == 1 { format!("1 {unit}") } else { format!("{n} {unit}s") }
    };
    if ticks % TICKS_PER_DAY == 0 {
        plural(ticks / TICKS_PER_DAY, "day")
    } else if ticks % TICKS_PER_HOUR == 0 {
        plural(ticks / TICKS_PER_HOUR, "hour")
    } else {
        plural(ticks, "tick")
    }
}
