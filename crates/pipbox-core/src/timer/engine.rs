//! Countdown engine.
//!
//! Owns the session, the single live tick schedule and the completion tone.
//! Time only moves when a tick arrives: the scheduler produces one per second
//! while running, and the caller feeds them back through `on_tick()`.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --tick(0)--> Finished
//!   ^               |                     |
//!   +----pause------+                     |
//!   +----stop / select_preset (any)-------+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let (scheduler, mut ticks) = IntervalScheduler::new();
//! let mut engine = CountdownEngine::new(Box::new(scheduler), tone);
//! engine.toggle();
//! while let Some(tick) = ticks.recv().await {
//!     engine.on_tick(tick); // Some(Event::TimerCompleted) at zero
//! }
//! ```

use chrono::Utc;

use super::session::{RunState, TickOutcome, TimerSession, DEFAULT_DURATION_SECS};
use super::ticker::{Tick, TickHandle, TickScheduler};
use crate::audio::{backend_for, BackendKind, LazyTone};
use crate::display::{format_clock, DisplayState, Preset, PRESETS};
use crate::events::Event;
use crate::storage::Config;

pub struct CountdownEngine {
    session: TimerSession,
    scheduler: Box<dyn TickScheduler>,
    /// Live schedule; `Some` exactly while running.
    ticker: Option<Box<dyn TickHandle>>,
    /// Bumped on every entry into `Running`.
    epoch: u64,
    tone: LazyTone,
}

impl CountdownEngine {
    /// Engine at the default 25:00, idle.
    pub fn new(scheduler: Box<dyn TickScheduler>, tone: LazyTone) -> Self {
        Self::with_duration(DEFAULT_DURATION_SECS, scheduler, tone)
    }

    pub fn with_duration(
        total_secs: u64,
        scheduler: Box<dyn TickScheduler>,
        tone: LazyTone,
    ) -> Self {
        Self {
            session: TimerSession::new(total_secs),
            scheduler,
            ticker: None,
            epoch: 0,
            tone,
        }
    }

    /// Engine using the configured default duration and tone settings.
    pub fn from_config(config: &Config, scheduler: Box<dyn TickScheduler>) -> Self {
        let kind = if config.tone.enabled {
            config.tone.backend
        } else {
            BackendKind::Silent
        };
        let tone = LazyTone::new(backend_for(kind), config.tone.spec());
        Self::with_duration(config.timer.default_duration_secs, scheduler, tone)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session(&self) -> &TimerSession {
        &self.session
    }

    pub fn state(&self) -> RunState {
        self.session.state()
    }

    pub fn remaining_secs(&self) -> u64 {
        self.session.remaining_secs()
    }

    pub fn total_secs(&self) -> u64 {
        self.session.total_secs()
    }

    pub fn is_running(&self) -> bool {
        self.session.is_running()
    }

    /// Epoch of the current (or most recent) running interval.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn tone_acquired(&self) -> bool {
        self.tone.is_acquired()
    }

    pub fn display_state(&self) -> DisplayState {
        let remaining = self.remaining_secs();
        DisplayState {
            formatted_time: format_clock(remaining),
            remaining_secs: remaining,
            total_secs: self.total_secs(),
            run_state: self.state().kind(),
            paused: self.session.is_paused(),
            available_presets: PRESETS.to_vec(),
            selected_preset: Preset::find(self.total_secs()).map(|p| p.seconds),
            can_stop: self.is_running(),
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state().kind(),
            remaining_secs: self.remaining_secs(),
            total_secs: self.total_secs(),
            formatted_time: format_clock(self.remaining_secs()),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume. No-op while running or with no time left.
    pub fn start(&mut self) -> Option<Event> {
        self.tone.acquire();
        let resumed = self.session.is_paused();
        if !self.session.start() {
            return None;
        }
        self.arm();
        tracing::debug!(
            remaining_secs = self.remaining_secs(),
            epoch = self.epoch,
            resumed,
            "timer started"
        );
        Some(Event::TimerStarted {
            remaining_secs: self.remaining_secs(),
            total_secs: self.total_secs(),
            resumed,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.session.pause() {
            return None;
        }
        self.disarm();
        tracing::debug!(remaining_secs = self.remaining_secs(), "timer paused");
        Some(Event::TimerPaused {
            remaining_secs: self.remaining_secs(),
            at: Utc::now(),
        })
    }

    /// Play/pause.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Back to idle at the full duration, from any state.
    pub fn stop(&mut self) -> Option<Event> {
        self.disarm();
        self.session.reset();
        tracing::debug!(total_secs = self.total_secs(), "timer stopped");
        Some(Event::TimerStopped {
            total_secs: self.total_secs(),
            at: Utc::now(),
        })
    }

    /// Replace the duration. Forces idle from any state.
    pub fn select_preset(&mut self, seconds: u64) -> Option<Event> {
        self.disarm();
        self.session.reload(seconds);
        tracing::debug!(total_secs = seconds, "preset selected");
        Some(Event::PresetSelected {
            total_secs: seconds,
            at: Utc::now(),
        })
    }

    /// Count down one second. Returns `Some(Event::TimerCompleted)` on the
    /// tick that reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        match self.session.tick() {
            TickOutcome::Ignored => None,
            TickOutcome::Counted { remaining_secs } => {
                tracing::trace!(remaining_secs, "tick");
                None
            }
            TickOutcome::Finished => {
                self.disarm();
                let tone_played = self.tone.play();
                tracing::info!(total_secs = self.total_secs(), tone_played, "timer completed");
                Some(Event::TimerCompleted {
                    total_secs: self.total_secs(),
                    tone_played,
                    at: Utc::now(),
                })
            }
        }
    }

    /// Apply a scheduled tick, dropping it if it belongs to a cancelled
    /// running interval.
    pub fn on_tick(&mut self, tick: Tick) -> Option<Event> {
        let live = self.ticker.as_ref().map(|t| t.epoch());
        if live != Some(tick.epoch) {
            tracing::trace!(epoch = tick.epoch, ?live, "stale tick dropped");
            return None;
        }
        self.tick()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn arm(&mut self) {
        self.disarm();
        self.epoch += 1;
        self.ticker = Some(self.scheduler.schedule(self.epoch));
    }

    fn disarm(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}

impl std::fmt::Debug for CountdownEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountdownEngine")
            .field("session", &self.session)
            .field("epoch", &self.epoch)
            .field("ticking", &self.ticker.is_some())
            .field("tone", &self.tone)
            .finish()
    }
}
