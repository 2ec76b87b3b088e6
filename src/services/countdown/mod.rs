mod clock;
mod config;
mod engine;
mod error;
mod loader;
mod models;
mod scheduler;
mod sink;
pub mod timing;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    Callbacks, CountdownConfig, FinishCallback, PartialConfig, PartialSelectors,
    PartialTimerSettings, TimerSettings, UnitSelectors, UpdateCallback,
};
pub use engine::{CountdownEngine, TICK_INTERVAL};
pub use error::CountdownError;
pub use loader::{default_config_path, load_partial_config};
pub use models::{Progress, Slot, TargetMode, TickOutcome, TickSnapshot, UnitValues};
pub use scheduler::{drive, IntervalScheduler, ManualScheduler, ScheduleId, Scheduler, TickReceiver};
pub use sink::{BufferResolver, BufferTarget, RenderTarget, SinkResolver};
