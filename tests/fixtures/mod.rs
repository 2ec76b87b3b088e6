// Test fixtures - reusable test data
// Provides a deterministic engine setup shared by the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rust_countdown::services::countdown::{
    BufferResolver, BufferTarget, CountdownEngine, ManualClock, ManualScheduler, PartialConfig,
    TickOutcome,
};

pub const CONTAINER: &str = "#countdown";

/// Returns 2026-01-15 09:00:00 UTC
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap()
}

/// An engine on a manual clock and scheduler, rendering into one buffer.
pub struct Rig {
    pub engine: CountdownEngine,
    pub clock: ManualClock,
    pub scheduler: ManualScheduler,
    pub buffer: BufferTarget,
}

impl Rig {
    pub fn new(config: PartialConfig) -> Self {
        let clock = ManualClock::new(epoch());
        let scheduler = ManualScheduler::new();
        let buffer = BufferTarget::with_default_slots();
        let resolver = BufferResolver::new().register(CONTAINER, buffer.clone());
        let engine = CountdownEngine::with_clock(
            &[CONTAINER],
            config,
            &resolver,
            Box::new(scheduler.clone()),
            Arc::new(clock.clone()),
        );
        Self {
            engine,
            clock,
            scheduler,
            buffer,
        }
    }

    /// Advances the clock and delivers one tick through the live
    /// registration, as a scheduler would.
    pub fn tick_after(&mut self, millis: i64) -> TickOutcome {
        self.clock.advance_ms(millis);
        match self.scheduler.active() {
            Some(id) => self.engine.handle_tick(id),
            None => TickOutcome::Idle,
        }
    }

    /// Rendered `days hours:minutes:seconds`.
    pub fn display(&self) -> String {
        format!(
            "{} {}:{}:{}",
            self.buffer.text(".days").unwrap_or_default(),
            self.buffer.text(".hours").unwrap_or_default(),
            self.buffer.text(".minutes").unwrap_or_default(),
            self.buffer.text(".seconds").unwrap_or_default(),
        )
    }
}
