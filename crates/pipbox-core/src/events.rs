use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::RunStateKind;

/// Every state change of the countdown produces an Event.
/// The render surface redraws on them; logs record them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        remaining_secs: u64,
        total_secs: u64,
        /// Started from part-way through rather than from the full duration.
        resumed: bool,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Remaining time hit zero. Emitted once per run.
    TimerCompleted {
        total_secs: u64,
        /// Whether the completion cue was actually produced.
        tone_played: bool,
        at: DateTime<Utc>,
    },
    /// Full reset to the configured duration.
    TimerStopped {
        total_secs: u64,
        at: DateTime<Utc>,
    },
    PresetSelected {
        total_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: RunStateKind,
        remaining_secs: u64,
        total_secs: u64,
        formatted_time: String,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Serde tag of this event, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TimerStarted { .. } => "TimerStarted",
            Event::TimerPaused { .. } => "TimerPaused",
            Event::TimerCompleted { .. } => "TimerCompleted",
            Event::TimerStopped { .. } => "TimerStopped",
            Event::PresetSelected { .. } => "PresetSelected",
            Event::StateSnapshot { .. } => "StateSnapshot",
        }
    }
}
