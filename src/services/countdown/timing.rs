//! Pure time arithmetic behind the countdown: target resolution, unit
//! decomposition, progress ratios and formatting. Nothing here reads the
//! clock; callers pass `now` in.

use chrono::{DateTime, Duration, TimeZone, Utc};

use super::config::CountdownConfig;
use super::error::CountdownError;
use super::models::{Progress, TargetMode, TickSnapshot, UnitValues};
use crate::utils::date::{civil_datetime, local_to_utc, parse_datetime};

pub const SECOND_MS: i64 = 1_000;
pub const MINUTE_MS: i64 = 60 * SECOND_MS;
pub const HOUR_MS: i64 = 60 * MINUTE_MS;
pub const DAY_MS: i64 = 24 * HOUR_MS;

/// Result of one target computation.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetComputation {
    pub start_at: DateTime<Utc>,
    pub target_at: DateTime<Utc>,
    /// Never negative.
    pub total_ms: i64,
    pub mode: TargetMode,
    pub error: Option<CountdownError>,
}

impl TargetComputation {
    /// Unreachable target: resolves to "already elapsed" at `now`.
    fn elapsed(now: DateTime<Utc>, error: CountdownError) -> Self {
        Self {
            start_at: now,
            target_at: now,
            total_ms: 0,
            mode: TargetMode::Invalid,
            error: Some(error),
        }
    }
}

/// Computes the countdown window starting at `now`.
///
/// Priority: relative duration, then the legacy date string, then the
/// granular date fields.
pub fn compute_target(config: &CountdownConfig, now: DateTime<Utc>) -> TargetComputation {
    if let Some(duration_ms) = config.relative_duration_ms() {
        // i64::MIN has no positive counterpart in TimeDelta.
        let offset = Duration::milliseconds(duration_ms.max(-i64::MAX));
        return match now.checked_add_signed(offset) {
            Some(target_at) => TargetComputation {
                start_at: now,
                target_at,
                total_ms: duration_ms.max(0),
                mode: TargetMode::Relative,
                error: None,
            },
            None => TargetComputation::elapsed(now, CountdownError::DurationOverflow { duration_ms }),
        };
    }

    match resolve_absolute(config) {
        Ok(target_at) => TargetComputation {
            start_at: now,
            target_at,
            total_ms: millis_between(now, target_at),
            mode: TargetMode::Absolute,
            error: None,
        },
        Err(error) => TargetComputation::elapsed(now, error),
    }
}

/// Resolves the absolute target instant from the legacy string or, failing
/// that, the granular fields.
pub fn resolve_absolute(config: &CountdownConfig) -> Result<DateTime<Utc>, CountdownError> {
    if let Some(date) = config.legacy_date() {
        return parse_datetime(date).ok_or_else(|| CountdownError::InvalidDate {
            input: date.to_string(),
        });
    }

    let invalid = || CountdownError::InvalidInstant {
        year: config.year,
        month: config.month,
        day: config.day,
        hour: config.hour,
        minute: config.minute,
        second: config.second,
        zone: if config.utc { "UTC" } else { "local" },
    };

    let naive = civil_datetime(
        config.year,
        config.month,
        config.day,
        config.hour,
        config.minute,
        config.second,
    )
    .ok_or_else(invalid)?;

    if config.utc {
        Ok(Utc.from_utc_datetime(&naive))
    } else {
        local_to_utc(naive).ok_or_else(invalid)
    }
}

/// `max(0, later - earlier)` in milliseconds.
pub fn millis_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    later
        .signed_duration_since(earlier)
        .num_milliseconds()
        .max(0)
}

/// Splits remaining milliseconds into whole days, hours, minutes and
/// seconds. Each unit is the remainder of the larger one.
pub fn decompose(time_left_ms: i64) -> UnitValues {
    let ms = time_left_ms.max(0);
    UnitValues {
        days: ms / DAY_MS,
        hours: (ms % DAY_MS) / HOUR_MS,
        minutes: (ms % HOUR_MS) / MINUTE_MS,
        seconds: (ms % MINUTE_MS) / SECOND_MS,
    }
}

/// Progress ratios for a window of `total_ms` with `elapsed_ms` gone.
///
/// A zero-length window counts as complete.
pub fn compute_progress(elapsed_ms: i64, total_ms: i64, units: &UnitValues) -> Progress {
    let (total, days) = if total_ms > 0 {
        let total = (elapsed_ms as f64 / total_ms as f64).clamp(0.0, 1.0);
        let days = units.days as f64 / (total_ms as f64 / DAY_MS as f64);
        (total, days)
    } else {
        (1.0, 0.0)
    };

    Progress {
        total,
        days,
        hours: units.hours as f64 / 24.0,
        minutes: units.minutes as f64 / 60.0,
        seconds: units.seconds as f64 / 60.0,
    }
}

/// Everything one tick derives from the clock and the current window.
pub fn snapshot_at(
    now: DateTime<Utc>,
    start_at: DateTime<Utc>,
    target_at: DateTime<Utc>,
    total_ms: i64,
) -> TickSnapshot {
    let time_left_ms = millis_between(now, target_at);
    let units = decompose(time_left_ms);
    let elapsed_ms = now.signed_duration_since(start_at).num_milliseconds();
    TickSnapshot {
        time_left_ms,
        units,
        progress: compute_progress(elapsed_ms, total_ms, &units),
    }
}

/// Formats one unit value for a sink.
pub fn format_unit(value: i64, zero_pad: bool) -> String {
    if zero_pad {
        format!("{value:02}")
    } else {
        value.to_string()
    }
}
