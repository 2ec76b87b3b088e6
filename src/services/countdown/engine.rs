use std::fmt;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Datelike, Local, Utc};

use super::clock::{Clock, SystemClock};
use super::config::{CountdownConfig, PartialConfig};
use super::error::CountdownError;
use super::models::{Slot, TargetMode, TickOutcome, TickSnapshot};
use super::scheduler::{ScheduleId, Scheduler};
use super::sink::{RenderTarget, SinkResolver};
use super::timing::{self, TargetComputation};

/// Cadence the engine asks its scheduler for.
pub const TICK_INTERVAL: StdDuration = StdDuration::from_millis(1_000);

#[derive(Debug, Clone)]
struct RuntimeState {
    start_at: DateTime<Utc>,
    target_at: DateTime<Utc>,
    total_ms: i64,
    mode: TargetMode,
    paused: bool,
    pause_started_at: Option<DateTime<Utc>>,
    finished: bool,
    registration: Option<ScheduleId>,
    last_snapshot: Option<TickSnapshot>,
}

impl RuntimeState {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            start_at: now,
            target_at: now,
            total_ms: 0,
            mode: TargetMode::Invalid,
            paused: true,
            pause_started_at: None,
            finished: false,
            registration: None,
            last_snapshot: None,
        }
    }
}

/// Countdown toward an absolute instant or across a relative duration.
///
/// The engine computes its target on construction and then processes one
/// tick per scheduler invocation: it derives the remaining time and
/// progress, writes the formatted units to its render targets and fires the
/// configured callbacks. Reaching zero releases the scheduler registration
/// and fires `on.finish` once; only [`restart`](Self::restart) or
/// [`update`](Self::update) arm it again.
///
/// All methods expect a single calling context; the scheduler must deliver
/// ticks serially.
pub struct CountdownEngine {
    selectors: Vec<String>,
    config: CountdownConfig,
    targets: Vec<Box<dyn RenderTarget>>,
    clock: Arc<dyn Clock>,
    scheduler: Box<dyn Scheduler>,
    state: RuntimeState,
    target_error: Option<CountdownError>,
}

impl fmt::Debug for CountdownEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountdownEngine")
            .field("selectors", &self.selectors)
            .field("config", &self.config)
            .field("targets", &self.targets.len())
            .field("state", &self.state)
            .field("target_error", &self.target_error)
            .finish()
    }
}

impl CountdownEngine {
    /// Builds an engine on the system clock.
    pub fn new(
        selectors: &[&str],
        config: PartialConfig,
        resolver: &dyn SinkResolver,
        scheduler: Box<dyn Scheduler>,
    ) -> Self {
        Self::with_clock(selectors, config, resolver, scheduler, Arc::new(SystemClock))
    }

    /// Resolves `selectors`, merges `config` over the defaults, computes the
    /// target and starts ticking. Zero resolved containers is reported but
    /// still yields a working engine that renders nothing.
    pub fn with_clock(
        selectors: &[&str],
        config: PartialConfig,
        resolver: &dyn SinkResolver,
        scheduler: Box<dyn Scheduler>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let selectors: Vec<String> = selectors.iter().map(|s| s.to_string()).collect();
        let targets: Vec<Box<dyn RenderTarget>> = selectors
            .iter()
            .flat_map(|selector| resolver.resolve(selector))
            .collect();

        if targets.is_empty() {
            let err = CountdownError::NoTargets {
                selectors: selectors.clone(),
            };
            log::warn!("{}; countdown will run without rendering", err);
        }

        let now = clock.now();
        let defaults = CountdownConfig::defaults_for_year(now.with_timezone(&Local).year());

        let mut engine = Self {
            selectors,
            config: defaults.merged(config),
            targets,
            clock,
            scheduler,
            state: RuntimeState::new(now),
            target_error: None,
        };
        engine.compute_target();
        engine.start_ticking();
        engine
    }

    /// Recomputes the target window from the current clock.
    fn compute_target(&mut self) {
        let TargetComputation {
            start_at,
            target_at,
            total_ms,
            mode,
            error,
        } = timing::compute_target(&self.config, self.clock.now());

        if let Some(err) = &error {
            log::warn!("{}; countdown treated as already elapsed", err);
        } else {
            log::info!(
                "Countdown target {} ({:?}, {}ms window)",
                target_at.to_rfc3339(),
                mode,
                total_ms
            );
        }

        self.state.start_at = start_at;
        self.state.target_at = target_at;
        self.state.total_ms = total_ms;
        self.state.mode = mode;
        self.state.finished = false;
        self.state.last_snapshot = None;
        self.target_error = error;
    }

    /// Takes a fresh scheduler registration and clears the pause gate.
    fn start_ticking(&mut self) {
        self.release_registration();
        self.state.registration = Some(self.scheduler.start(TICK_INTERVAL));
        self.state.paused = false;
        self.state.pause_started_at = None;
    }

    fn release_registration(&mut self) {
        if let Some(id) = self.state.registration.take() {
            self.scheduler.release(id);
        }
    }

    /// Processes a tick delivered for registration `id`. Ticks from
    /// released registrations are ignored.
    pub fn handle_tick(&mut self, id: ScheduleId) -> TickOutcome {
        if self.state.registration != Some(id) {
            log::debug!("Ignoring tick from stale registration {:?}", id);
            return TickOutcome::Idle;
        }
        self.tick()
    }

    /// Reads the clock, renders the remaining time and fires callbacks.
    /// Does nothing while paused or stopped.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.paused {
            return TickOutcome::Idle;
        }

        let snapshot = timing::snapshot_at(
            self.clock.now(),
            self.state.start_at,
            self.state.target_at,
            self.state.total_ms,
        );
        self.state.last_snapshot = Some(snapshot);

        self.render(&snapshot);

        if let Some(on_update) = self.config.on.update.clone() {
            on_update(
                self,
                &snapshot.progress,
                snapshot.time_left_ms,
                &snapshot.units,
            );
        }

        if !snapshot.is_complete() {
            return TickOutcome::Running(snapshot);
        }

        self.stop();
        self.state.finished = true;
        log::info!("Countdown finished");
        if let Some(on_finish) = self.config.on.finish.clone() {
            on_finish(self);
        }
        TickOutcome::Finished(snapshot)
    }

    fn render(&mut self, snapshot: &TickSnapshot) {
        if self.targets.is_empty() {
            return;
        }

        for slot in Slot::ALL {
            let Some(selector) = self.config.selectors.get(slot) else {
                continue;
            };
            let text = timing::format_unit(snapshot.units.get(slot), self.config.zero_pad);
            for target in &mut self.targets {
                if target.render(selector, &text) == 0 {
                    let warning = CountdownError::MissingSink {
                        slot,
                        selector: selector.to_string(),
                    };
                    log::debug!("{}", warning);
                }
            }
        }
    }

    /// Gates tick processing. Repeated calls keep the first pause instant.
    pub fn pause(&mut self) {
        if self.state.paused {
            return;
        }
        self.state.paused = true;
        self.state.pause_started_at = Some(self.clock.now());
        log::debug!("Countdown paused");
    }

    /// Re-arms a paused countdown.
    ///
    /// A relative countdown with `disable_on_pause` set shifts its whole
    /// window forward by the time spent paused, so the remaining time is
    /// what it was when paused. Otherwise the paused time counts against the
    /// countdown. No-op when running or finished.
    pub fn resume(&mut self) {
        if !self.state.paused || self.state.finished {
            return;
        }

        if let Some(paused_at) = self.state.pause_started_at {
            if self.state.mode == TargetMode::Relative && self.config.timer.disable_on_pause {
                let paused_for = self.clock.now().signed_duration_since(paused_at);
                if let (Some(start_at), Some(target_at)) = (
                    self.state.start_at.checked_add_signed(paused_for),
                    self.state.target_at.checked_add_signed(paused_for),
                ) {
                    self.state.start_at = start_at;
                    self.state.target_at = target_at;
                    log::debug!(
                        "Shifted countdown window by {}ms of pause",
                        paused_for.num_milliseconds()
                    );
                }
            }
        }

        self.start_ticking();
    }

    /// Releases the scheduler registration and gates ticks. Idempotent.
    pub fn stop(&mut self) {
        self.release_registration();
        self.state.paused = true;
    }

    /// Recomputes the target from now and starts ticking again.
    pub fn restart(&mut self) {
        self.stop();
        self.compute_target();
        self.start_ticking();
        log::info!("Countdown restarted");
    }

    /// Merges `partial` over the current configuration and restarts. The
    /// timing window always starts fresh at the moment of the update.
    pub fn update(&mut self, partial: PartialConfig) {
        self.config = self.config.merged(partial);
        self.restart();
    }

    pub fn config(&self) -> &CountdownConfig {
        &self.config
    }

    /// Container selectors given at construction.
    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }

    pub fn has_targets(&self) -> bool {
        !self.targets.is_empty()
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn is_finished(&self) -> bool {
        self.state.finished
    }

    /// Whether a scheduler registration is held.
    pub fn is_ticking(&self) -> bool {
        self.state.registration.is_some()
    }

    pub fn registration(&self) -> Option<ScheduleId> {
        self.state.registration
    }

    /// Why the current target is unreachable, if it is.
    pub fn target_error(&self) -> Option<&CountdownError> {
        self.target_error.as_ref()
    }

    pub fn target_mode(&self) -> TargetMode {
        self.state.mode
    }

    pub fn start_at(&self) -> DateTime<Utc> {
        self.state.start_at
    }

    pub fn target_at(&self) -> DateTime<Utc> {
        self.state.target_at
    }

    pub fn total_duration_ms(&self) -> i64 {
        self.state.total_ms
    }

    /// Remaining milliseconds by the clock right now.
    pub fn time_left_ms(&self) -> i64 {
        timing::millis_between(self.clock.now(), self.state.target_at)
    }

    /// Values from the most recent processed tick of the current target.
    pub fn last_snapshot(&self) -> Option<&TickSnapshot> {
        self.state.last_snapshot.as_ref()
    }
}

impl Drop for CountdownEngine {
    fn drop(&mut self) {
        self.release_registration();
    }
}
