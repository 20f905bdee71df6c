mod engine;
mod session;
mod ticker;

pub use engine::CountdownEngine;
pub use session::{RunState, RunStateKind, TickOutcome, TimerSession, DEFAULT_DURATION_SECS};
pub use ticker::{IntervalScheduler, ManualScheduler, Tick, TickHandle, TickScheduler};
