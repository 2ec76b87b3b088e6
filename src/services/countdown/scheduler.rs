//! Periodic tick delivery.
//!
//! The engine owns at most one registration at a time. It acquires it with
//! [`Scheduler::start`] and gives it back exactly once with
//! [`Scheduler::release`]; ticks carrying any other id are ignored by
//! [`CountdownEngine::handle_tick`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::runtime::{Handle, TryCurrentError};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use super::engine::CountdownEngine;
use super::models::{TickOutcome, TickSnapshot};

/// Identifier of one periodic registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleId(pub u64);

#[cfg_attr(test, mockall::automock)]
pub trait Scheduler: Send {
    /// Begins invoking the engine roughly every `period`.
    fn start(&mut self, period: Duration) -> ScheduleId;

    /// Ends a registration. Unknown or already released ids are ignored.
    fn release(&mut self, id: ScheduleId);
}

#[derive(Debug, Default)]
struct ManualState {
    next_id: u64,
    active: Vec<ScheduleId>,
    started: usize,
    released: usize,
}

/// Scheduler that only tracks registrations. The host calls
/// [`CountdownEngine::tick`] itself. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent live registration.
    pub fn active(&self) -> Option<ScheduleId> {
        self.lock().active.last().copied()
    }

    pub fn active_count(&self) -> usize {
        self.lock().active.len()
    }

    pub fn start_count(&self) -> usize {
        self.lock().started
    }

    pub fn release_count(&self) -> usize {
        self.lock().released
    }

    fn lock(&self) -> MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for ManualScheduler {
    fn start(&mut self, _period: Duration) -> ScheduleId {
        let mut state = self.lock();
        state.next_id += 1;
        let id = ScheduleId(state.next_id);
        state.active.push(id);
        state.started += 1;
        id
    }

    fn release(&mut self, id: ScheduleId) {
        let mut state = self.lock();
        let before = state.active.len();
        state.active.retain(|active| *active != id);
        if state.active.len() != before {
            state.released += 1;
        }
    }
}

/// Scheduler backed by tokio interval tasks. Each registration publishes
/// its id on a channel once per period; [`drive`] feeds those ids to the
/// engine one at a time.
pub struct IntervalScheduler {
    runtime: Handle,
    sender: UnboundedSender<ScheduleId>,
    tasks: HashMap<ScheduleId, JoinHandle<()>>,
    next_id: u64,
}

/// Receiving end for [`IntervalScheduler`] ticks.
pub type TickReceiver = UnboundedReceiver<ScheduleId>;

impl IntervalScheduler {
    pub fn new(runtime: Handle) -> (Self, TickReceiver) {
        let (sender, receiver) = unbounded_channel();
        let scheduler = Self {
            runtime,
            sender,
            tasks: HashMap::new(),
            next_id: 0,
        };
        (scheduler, receiver)
    }

    /// Builds a scheduler on the runtime the caller is running in.
    pub fn from_current() -> Result<(Self, TickReceiver), TryCurrentError> {
        Ok(Self::new(Handle::try_current()?))
    }

    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }
}

impl Scheduler for IntervalScheduler {
    fn start(&mut self, period: Duration) -> ScheduleId {
        self.next_id += 1;
        let id = ScheduleId(self.next_id);
        let sender = self.sender.clone();

        let task = self.runtime.spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                // The first tick completes immediately.
                interval.tick().await;
                if sender.send(id).is_err() {
                    break;
                }
            }
        });

        self.tasks.insert(id, task);
        log::debug!("Started tick registration {:?} every {:?}", id, period);
        id
    }

    fn release(&mut self, id: ScheduleId) {
        if let Some(task) = self.tasks.remove(&id) {
            task.abort();
            log::debug!("Released tick registration {:?}", id);
        }
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

/// Delivers scheduler ticks to `engine` serially until the countdown
/// finishes. Returns the final snapshot, or `None` if the channel closes
/// first.
pub async fn drive(engine: &mut CountdownEngine, ticks: &mut TickReceiver) -> Option<TickSnapshot> {
    while let Some(id) = ticks.recv().await {
        if let TickOutcome::Finished(snapshot) = engine.handle_tick(id) {
            return Some(snapshot);
        }
    }
    None
}
