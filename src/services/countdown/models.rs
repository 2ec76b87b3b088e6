use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical render slot a formatted unit value is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl Slot {
    /// Render order used on every tick.
    pub const ALL: [Slot; 4] = [Slot::Days, Slot::Hours, Slot::Minutes, Slot::Seconds];

    pub fn label(self) -> &'static str {
        match self {
            Slot::Days => "days",
            Slot::Hours => "hours",
            Slot::Minutes => "minutes",
            Slot::Seconds => "seconds",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Remaining time broken into fixed-length units. `days` is unbounded,
/// the others stay below 24/60/60.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitValues {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl UnitValues {
    pub fn get(&self, slot: Slot) -> i64 {
        match slot {
            Slot::Days => self.days,
            Slot::Hours => self.hours,
            Slot::Minutes => self.minutes,
            Slot::Seconds => self.seconds,
        }
    }
}

/// Progress ratios reported on each tick.
///
/// `total` is the elapsed share of the whole countdown window. The per-unit
/// ratios are meant for unit-local indicators (one ring per unit) and are
/// measured against fixed maxima, not against the total duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub total: f64,
    pub days: f64,
    pub hours: f64,
    pub minutes: f64,
    pub seconds: f64,
}

/// How the active target was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetMode {
    /// Countdown of a fixed length measured from the computation instant.
    Relative,
    /// Countdown to a calendar instant, from the legacy string or the
    /// granular date fields.
    Absolute,
    /// The configured instant could not be resolved; treated as elapsed.
    Invalid,
}

/// Values derived by one processed tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub time_left_ms: i64,
    pub units: UnitValues,
    pub progress: Progress,
}

impl TickSnapshot {
    pub fn is_complete(&self) -> bool {
        self.time_left_ms <= 0
    }
}

/// Result of delivering one tick to the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Paused, stopped or stale registration; nothing was processed.
    Idle,
    Running(TickSnapshot),
    /// The countdown reached zero on this tick.
    Finished(TickSnapshot),
}

impl TickOutcome {
    pub fn snapshot(&self) -> Option<&TickSnapshot> {
        match self {
            TickOutcome::Idle => None,
            TickOutcome::Running(snapshot) | TickOutcome::Finished(snapshot) => Some(snapshot),
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, TickOutcome::Finished(_))
    }
}
