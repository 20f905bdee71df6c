use serde::{Deserialize, Serialize};

/// Default session length: 25:00.
pub const DEFAULT_DURATION_SECS: u64 = 1500;

/// Run state of the single countdown session.
///
/// `Idle` carries its remaining time, so a paused session and a fresh one
/// are the same variant distinguished by payload rather than by comparing
/// against the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum RunState {
    Idle { remaining_secs: u64 },
    Running { remaining_secs: u64 },
    Finished,
}

/// Payload-free view of [`RunState`] for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStateKind {
    Idle,
    Running,
    Finished,
}

impl RunState {
    pub fn kind(&self) -> RunStateKind {
        match self {
            RunState::Idle { .. } => RunStateKind::Idle,
            RunState::Running { .. } => RunStateKind::Running,
            RunState::Finished => RunStateKind::Finished,
        }
    }

    pub fn remaining_secs(&self) -> u64 {
        match *self {
            RunState::Idle { remaining_secs } | RunState::Running { remaining_secs } => {
                remaining_secs
            }
            RunState::Finished => 0,
        }
    }
}

/// What a single tick did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; nothing changed.
    Ignored,
    /// One second counted down, time still left.
    Counted { remaining_secs: u64 },
    /// This tick reached zero. Returned once per run.
    Finished,
}

/// The countdown session: a total duration and where we are within it.
///
/// Pure state, no scheduling and no side effects. The engine wraps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSession {
    total_secs: u64,
    state: RunState,
}

impl Default for TimerSession {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_SECS)
    }
}

impl TimerSession {
    pub fn new(total_secs: u64) -> Self {
        Self {
            total_secs,
            state: RunState::Idle {
                remaining_secs: total_secs,
            },
        }
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.state.remaining_secs()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, RunState::Running { .. })
    }

    /// Idle with part of the duration already consumed.
    pub fn is_paused(&self) -> bool {
        matches!(self.state, RunState::Idle { remaining_secs } if remaining_secs < self.total_secs)
    }

    /// Enter `Running` if there is time left. Returns whether the state changed.
    pub(crate) fn start(&mut self) -> bool {
        match self.state {
            RunState::Idle { remaining_secs } if remaining_secs > 0 => {
                self.state = RunState::Running { remaining_secs };
                true
            }
            _ => false,
        }
    }

    /// Leave `Running`, keeping the remaining time.
    pub(crate) fn pause(&mut self) -> bool {
        match self.state {
            RunState::Running { remaining_secs } => {
                self.state = RunState::Idle { remaining_secs };
                true
            }
            _ => false,
        }
    }

    pub(crate) fn tick(&mut self) -> TickOutcome {
        match self.state {
            RunState::Running { remaining_secs } => {
                let remaining_secs = remaining_secs.saturating_sub(1);
                if remaining_secs == 0 {
                    self.state = RunState::Finished;
                    TickOutcome::Finished
                } else {
                    self.state = RunState::Running { remaining_secs };
                    TickOutcome::Counted { remaining_secs }
                }
            }
            _ => TickOutcome::Ignored,
        }
    }

    /// Back to `Idle` with the full duration.
    pub(crate) fn reset(&mut self) {
        self.state = RunState::Idle {
            remaining_secs: self.total_secs,
        };
    }

    /// Replace the duration and reset.
    pub(crate) fn reload(&mut self, total_secs: u64) {
        self.total_secs = total_secs;
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_idle_with_full_time() {
        let session = TimerSession::default();
        assert_eq!(session.total_secs(), 1500);
        assert_eq!(session.state(), RunState::Idle { remaining_secs: 1500 });
        assert!(!session.is_paused());
    }

    #[test]
    fn pause_keeps_remaining_and_marks_paused() {
        let mut session = TimerSession::new(10);
        assert!(session.start());
        session.tick();
        session.tick();
        assert!(session.pause());
        assert_eq!(session.state(), RunState::Idle { remaining_secs: 8 });
        assert!(session.is_paused());
    }

    #[test]
    fn start_twice_is_noop() {
        let mut session = TimerSession::new(10);
        assert!(session.start());
        assert!(!session.start());
        assert!(session.is_running());
    }

    #[test]
    fn last_tick_finishes_exactly_once() {
        let mut session = TimerSession::new(2);
        session.start();
        assert_eq!(session.tick(), TickOutcome::Counted { remaining_secs: 1 });
        assert_eq!(session.tick(), TickOutcome::Finished);
        assert_eq!(session.tick(), TickOutcome::Ignored);
        assert_eq!(session.remaining_secs(), 0);
        assert_eq!(session.state().kind(), RunStateKind::Finished);
    }

    #[test]
    fn finished_cannot_start_until_reset() {
        let mut session = TimerSession::new(1);
        session.start();
        session.tick();
        assert!(!session.start());
        session.reset();
        assert!(session.start());
    }

    #[test]
    fn zero_length_session_never_runs() {
        let mut session = TimerSession::new(0);
        assert!(!session.start());
        assert_eq!(session.tick(), TickOutcome::Ignored);
    }

    #[test]
    fn idle_ticks_are_ignored() {
        let mut session = TimerSession::new(5);
        assert_eq!(session.tick(), TickOutcome::Ignored);
        assert_eq!(session.remaining_secs(), 5);
    }

    #[test]
    fn run_state_serializes_with_tag() {
        let json = serde_json::to_value(RunState::Idle { remaining_secs: 42 }).unwrap();
        assert_eq!(json["state"], "idle");
        assert_eq!(json["remaining_secs"], 42);
        let json = serde_json::to_value(RunState::Finished).unwrap();
        assert_eq!(json["state"], "finished");
    }
}
