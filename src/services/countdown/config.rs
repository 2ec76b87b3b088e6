//! Countdown configuration and the partial overlay used for construction
//! and reconfiguration.
//!
//! A [`CountdownConfig`] is a complete value. Callers never mutate it in
//! place on a running engine; they hand a [`PartialConfig`] to the engine,
//! which builds a fresh configuration with [`CountdownConfig::merged`] and
//! swaps it in.

use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, Local};
use serde::Deserialize;

use super::engine::CountdownEngine;
use super::models::{Progress, Slot, UnitValues};

/// Called once per processed tick with the progress ratios, the remaining
/// milliseconds and the unit breakdown.
pub type UpdateCallback =
    Arc<dyn Fn(&CountdownEngine, &Progress, i64, &UnitValues) + Send + Sync>;

/// Called once when a countdown reaches zero.
pub type FinishCallback = Arc<dyn Fn(&CountdownEngine) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSettings {
    /// Relative countdown length in milliseconds. `None` or zero selects an
    /// absolute target.
    pub duration: Option<i64>,
    /// Freeze a relative countdown while paused.
    pub disable_on_pause: bool,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            duration: None,
            disable_on_pause: true,
        }
    }
}

/// Selector per render slot. An empty selector disables the slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitSelectors {
    pub days: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

impl Default for UnitSelectors {
    fn default() -> Self {
        Self {
            days: ".days".to_string(),
            hours: ".hours".to_string(),
            minutes: ".minutes".to_string(),
            seconds: ".seconds".to_string(),
        }
    }
}

impl UnitSelectors {
    pub fn get(&self, slot: Slot) -> Option<&str> {
        let selector = match slot {
            Slot::Days => &self.days,
            Slot::Hours => &self.hours,
            Slot::Minutes => &self.minutes,
            Slot::Seconds => &self.seconds,
        };
        let trimmed = selector.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

#[derive(Clone, Default)]
pub struct Callbacks {
    pub update: Option<UpdateCallback>,
    pub finish: Option<FinishCallback>,
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("update", &self.update.is_some())
            .field("finish", &self.finish.is_some())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct CountdownConfig {
    pub year: i32,
    /// 1-based month.
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// Interpret the granular fields as UTC instead of local civil time.
    pub utc: bool,
    /// Free-form date string. Takes precedence over the granular fields.
    pub date: Option<String>,
    pub timer: TimerSettings,
    pub zero_pad: bool,
    pub selectors: UnitSelectors,
    pub on: Callbacks,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self::defaults_for_year(Local::now().year())
    }
}

impl CountdownConfig {
    /// Default configuration: midnight on January 1st of `year`, local time.
    pub fn defaults_for_year(year: i32) -> Self {
        Self {
            year,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
            utc: false,
            date: None,
            timer: TimerSettings::default(),
            zero_pad: true,
            selectors: UnitSelectors::default(),
            on: Callbacks::default(),
        }
    }

    /// Returns a new configuration with every field present in `partial`
    /// replacing the corresponding field here. Nested groups merge field by
    /// field, so a partial `timer` that only sets the duration keeps the
    /// current pause behaviour.
    pub fn merged(&self, partial: PartialConfig) -> Self {
        let mut next = self.clone();

        if let Some(year) = partial.year {
            next.year = year;
        }
        if let Some(month) = partial.month {
            next.month = month;
        }
        if let Some(day) = partial.day {
            next.day = day;
        }
        if let Some(hour) = partial.hour {
            next.hour = hour;
        }
        if let Some(minute) = partial.minute {
            next.minute = minute;
        }
        if let Some(second) = partial.second {
            next.second = second;
        }
        if let Some(utc) = partial.utc {
            next.utc = utc;
        }
        if let Some(date) = partial.date {
            next.date = Some(date);
        }
        if let Some(zero_pad) = partial.zero_pad {
            next.zero_pad = zero_pad;
        }

        if let Some(duration) = partial.timer.duration {
            next.timer.duration = Some(duration);
        }
        if let Some(disable_on_pause) = partial.timer.disable_on_pause {
            next.timer.disable_on_pause = disable_on_pause;
        }

        if let Some(days) = partial.selectors.days {
            next.selectors.days = days;
        }
        if let Some(hours) = partial.selectors.hours {
            next.selectors.hours = hours;
        }
        if let Some(minutes) = partial.selectors.minutes {
            next.selectors.minutes = minutes;
        }
        if let Some(seconds) = partial.selectors.seconds {
            next.selectors.seconds = seconds;
        }

        if partial.on.update.is_some() {
            next.on.update = partial.on.update;
        }
        if partial.on.finish.is_some() {
            next.on.finish = partial.on.finish;
        }

        next
    }

    /// The relative duration, if one is active. Zero counts as unset.
    pub fn relative_duration_ms(&self) -> Option<i64> {
        self.timer.duration.filter(|duration| *duration != 0)
    }

    /// The legacy date string, if one is active. Blank counts as unset.
    pub fn legacy_date(&self) -> Option<&str> {
        self.date
            .as_deref()
            .map(str::trim)
            .filter(|date| !date.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PartialTimerSettings {
    pub duration: Option<i64>,
    #[serde(alias = "disableOnPause")]
    pub disable_on_pause: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PartialSelectors {
    pub days: Option<String>,
    pub hours: Option<String>,
    pub minutes: Option<String>,
    pub seconds: Option<String>,
}

/// Overlay applied on top of defaults at construction, or on top of the
/// current configuration by [`CountdownEngine::update`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PartialConfig {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub second: Option<u32>,
    pub utc: Option<bool>,
    pub date: Option<String>,
    pub timer: PartialTimerSettings,
    #[serde(alias = "zeroPad")]
    pub zero_pad: Option<bool>,
    pub selectors: PartialSelectors,
    #[serde(skip)]
    pub on: Callbacks,
}

impl PartialConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relative countdown of `duration_ms` milliseconds. Zero switches back
    /// to the absolute target.
    pub fn with_duration_ms(mut self, duration_ms: i64) -> Self {
        self.timer.duration = Some(duration_ms);
        self
    }

    pub fn with_disable_on_pause(mut self, disable_on_pause: bool) -> Self {
        self.timer.disable_on_pause = Some(disable_on_pause);
        self
    }

    /// Free-form target date. An empty string clears it.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Granular target, month 1-based.
    pub fn with_target(
        mut self,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Self {
        self.year = Some(year);
        self.month = Some(month);
        self.day = Some(day);
        self.hour = Some(hour);
        self.minute = Some(minute);
        self.second = Some(second);
        self
    }

    pub fn with_utc(mut self, utc: bool) -> Self {
        self.utc = Some(utc);
        self
    }

    pub fn with_zero_pad(mut self, zero_pad: bool) -> Self {
        self.zero_pad = Some(zero_pad);
        self
    }

    pub fn with_selector(mut self, slot: Slot, selector: impl Into<String>) -> Self {
        let selector = Some(selector.into());
        match slot {
            Slot::Days => self.selectors.days = selector,
            Slot::Hours => self.selectors.hours = selector,
            Slot::Minutes => self.selectors.minutes = selector,
            Slot::Seconds => self.selectors.seconds = selector,
        }
        self
    }

    pub fn on_update<F>(mut self, callback: F) -> Self
    where
        F: Fn(&CountdownEngine, &Progress, i64, &UnitValues) + Send + Sync + 'static,
    {
        self.on.update = Some(Arc::new(callback));
        self
    }

    pub fn on_finish<F>(mut self, callback: F) -> Self
    where
        F: Fn(&CountdownEngine) + Send + Sync + 'static,
    {
        self.on.finish = Some(Arc::new(callback));
        self
    }
}
