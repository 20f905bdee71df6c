//! # PipBox Core Library
//!
//! This library provides the logic behind the PipBox live timer widget: a
//! single countdown session that can be started, paused, resumed, reset to
//! a preset length, and that plays a short cue when it reaches zero.
//! Whatever draws the widget (the `pipbox` CLI, or anything else) only
//! reflects engine state and relays commands.
//!
//! ## Architecture
//!
//! - **Countdown Engine**: a state machine advanced by one-second ticks from
//!   a cancellable scheduler; at most one schedule is live at a time
//! - **Audio**: the completion tone, acquired lazily on first start and
//!   degrading to silence when no output is available
//! - **Display**: `MM:SS` formatting, the preset catalog and render snapshots
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`CountdownEngine`]: Core timer state machine
//! - [`LazyTone`]: Completion tone capability
//! - [`DisplayState`]: Read-only view for rendering
//! - [`Config`]: Application configuration management

pub mod audio;
pub mod display;
pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use audio::{BackendKind, LazyTone, ToneBackend, ToneSpec};
pub use display::{format_clock, DisplayState, Preset, PRESETS};
pub use error::{AudioError, ConfigError, CoreError};
pub use events::Event;
pub use storage::Config;
pub use timer::{
    CountdownEngine, IntervalScheduler, ManualScheduler, RunState, RunStateKind, Tick,
    TimerSession,
};
