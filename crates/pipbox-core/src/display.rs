//! Read-only view of the engine for whatever is drawing the widget.

use serde::Serialize;

use crate::timer::RunStateKind;

/// A selectable session length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Preset {
    pub label: &'static str,
    pub seconds: u64,
}

/// Preset catalog, in display order. 20:05 is deliberate.
pub const PRESETS: [Preset; 4] = [
    Preset { label: "05:00", seconds: 300 },
    Preset { label: "10:00", seconds: 600 },
    Preset { label: "15:00", seconds: 900 },
    Preset { label: "20:05", seconds: 1205 },
];

impl Preset {
    /// Catalog entry with exactly this length.
    pub fn find(seconds: u64) -> Option<Preset> {
        PRESETS.iter().copied().find(|p| p.seconds == seconds)
    }
}

/// `MM:SS`, zero padded. Minutes do not wrap at an hour.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Everything the render surface needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayState {
    pub formatted_time: String,
    pub remaining_secs: u64,
    pub total_secs: u64,
    pub run_state: RunStateKind,
    /// Idle with part of the session already used.
    pub paused: bool,
    pub available_presets: Vec<Preset>,
    /// Seconds of the catalog entry matching the current total, if any.
    pub selected_preset: Option<u64>,
    /// Whether to offer the stop control. Only while running.
    pub can_stop: bool,
}
