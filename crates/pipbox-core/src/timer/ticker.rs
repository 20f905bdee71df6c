//! One-second tick scheduling.
//!
//! Each time the engine enters `Running` it asks its [`TickScheduler`] for a
//! fresh recurring schedule tagged with a new epoch, and holds the returned
//! [`TickHandle`] until it leaves `Running`. Cancelling is the only thing a
//! handle can do.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// A tick delivered for one running interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub epoch: u64,
}

/// Creates one recurring schedule per running interval.
pub trait TickScheduler {
    /// Start ticking once per period, first tick one full period from now.
    fn schedule(&mut self, epoch: u64) -> Box<dyn TickHandle>;
}

/// The single live schedule held by the engine.
pub trait TickHandle {
    fn epoch(&self) -> u64;

    /// Stop the schedule. Synchronous: no tick for this epoch is produced
    /// after this returns.
    fn cancel(self: Box<Self>);
}

// ── tokio interval ──────────────────────────────────────────────────

/// Ticks from a spawned tokio interval task, delivered over a channel.
///
/// Must be used from within a tokio runtime.
pub struct IntervalScheduler {
    tx: mpsc::UnboundedSender<Tick>,
    period: Duration,
}

impl IntervalScheduler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Tick>) {
        Self::with_period(Duration::from_secs(1))
    }

    pub fn with_period(period: Duration) -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, period }, rx)
    }
}

impl TickScheduler for IntervalScheduler {
    fn schedule(&mut self, epoch: u64) -> Box<dyn TickHandle> {
        let tx = self.tx.clone();
        let period = self.period;
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(Tick { epoch }).is_err() {
                    break;
                }
            }
        });
        tracing::trace!(epoch, "interval scheduled");
        Box::new(IntervalHandle { epoch, task })
    }
}

struct IntervalHandle {
    epoch: u64,
    task: JoinHandle<()>,
}

impl TickHandle for IntervalHandle {
    fn epoch(&self) -> u64 {
        self.epoch
    }

    fn cancel(self: Box<Self>) {
        self.task.abort();
        tracing::trace!(epoch = self.epoch, "interval cancelled");
    }
}

// ── manual ──────────────────────────────────────────────────────────

/// Records schedules without producing ticks; the caller drives
/// `CountdownEngine::tick` by hand.
///
/// Clones share the same log, so a test can keep one clone and hand the
/// other to the engine.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    log: Arc<Mutex<ManualLog>>,
}

#[derive(Debug, Default)]
struct ManualLog {
    live: Vec<u64>,
    scheduled: usize,
    cancelled: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_log<R>(&self, f: impl FnOnce(&mut ManualLog) -> R) -> R {
        let mut log = self.log.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut log)
    }

    /// Epochs whose schedules have not been cancelled.
    pub fn live_epochs(&self) -> Vec<u64> {
        self.with_log(|log| log.live.clone())
    }

    pub fn live_count(&self) -> usize {
        self.with_log(|log| log.live.len())
    }

    pub fn scheduled_count(&self) -> usize {
        self.with_log(|log| log.scheduled)
    }

    pub fn cancelled_count(&self) -> usize {
        self.with_log(|log| log.cancelled)
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule(&mut self, epoch: u64) -> Box<dyn TickHandle> {
        self.with_log(|log| {
            log.live.push(epoch);
            log.scheduled += 1;
        });
        Box::new(ManualHandle {
            epoch,
            log: Arc::clone(&self.log),
        })
    }
}

struct ManualHandle {
    epoch: u64,
    log: Arc<Mutex<ManualLog>>,
}

impl TickHandle for ManualHandle {
    fn epoch(&self) -> u64 {
        self.epoch
    }

    fn cancel(self: Box<Self>) {
        let mut log = self.log.lock().unwrap_or_else(|e| e.into_inner());
        log.live.retain(|&e| e != self.epoch);
        log.cancelled += 1;
    }
}
