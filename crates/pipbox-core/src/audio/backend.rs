use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::tone::ToneSpec;
use crate::error::AudioError;

/// Something that can produce one short audible cue.
pub trait Chime {
    fn play(&mut self) -> Result<(), AudioError>;
}

/// Acquires the tone capability. Called at most once per engine.
pub trait ToneBackend {
    /// Short identifier used in logs (e.g. "bell", "rodio").
    fn name(&self) -> &str;

    fn open(&mut self, spec: &ToneSpec) -> Result<Box<dyn Chime>, AudioError>;
}

/// Which backend the configuration asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Terminal bell.
    #[default]
    Bell,
    /// Synthesized tone on the default output device.
    Rodio,
    /// No sound at all.
    Silent,
}

/// Build the backend for `kind`.
///
/// `Rodio` without the `audio` feature yields a backend whose `open` fails,
/// so the engine degrades to a silent completion.
pub fn backend_for(kind: BackendKind) -> Box<dyn ToneBackend> {
    match kind {
        BackendKind::Bell => Box::new(BellBackend),
        BackendKind::Silent => Box::new(SilentBackend),
        #[cfg(feature = "audio")]
        BackendKind::Rodio => Box::new(super::rodio_backend::RodioBackend::default()),
        #[cfg(not(feature = "audio"))]
        BackendKind::Rodio => Box::new(UnavailableBackend {
            reason: "built without the `audio` feature".into(),
        }),
    }
}

// ── bell ────────────────────────────────────────────────────────────

/// Rings the terminal bell on stderr.
#[derive(Debug, Default)]
pub struct BellBackend;

impl ToneBackend for BellBackend {
    fn name(&self) -> &str {
        "bell"
    }

    fn open(&mut self, _spec: &ToneSpec) -> Result<Box<dyn Chime>, AudioError> {
        Ok(Box::new(BellChime))
    }
}

struct BellChime;

impl Chime for BellChime {
    fn play(&mut self) -> Result<(), AudioError> {
        let mut err = std::io::stderr().lock();
        err.write_all(b"\x07")
            .and_then(|_| err.flush())
            .map_err(|e| AudioError::Playback(e.to_string()))
    }
}

// ── silent ──────────────────────────────────────────────────────────

/// Opens fine and plays nothing.
#[derive(Debug, Default)]
pub struct SilentBackend;

impl ToneBackend for SilentBackend {
    fn name(&self) -> &str {
        "silent"
    }

    fn open(&mut self, _spec: &ToneSpec) -> Result<Box<dyn Chime>, AudioError> {
        Ok(Box::new(SilentChime))
    }
}

struct SilentChime;

impl Chime for SilentChime {
    fn play(&mut self) -> Result<(), AudioError> {
        Ok(())
    }
}

// ── unavailable ─────────────────────────────────────────────────────

/// Always refuses to open. Stands in for platforms without audio output.
#[derive(Debug, Clone)]
pub struct UnavailableBackend {
    pub reason: String,
}

impl ToneBackend for UnavailableBackend {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn open(&mut self, _spec: &ToneSpec) -> Result<Box<dyn Chime>, AudioError> {
        Err(AudioError::DeviceUnavailable(self.reason.clone()))
    }
}

// ── counting ────────────────────────────────────────────────────────

/// Plays nothing but counts acquisitions and cues. Clones share counters.
#[derive(Debug, Clone, Default)]
pub struct CountingBackend {
    opened: Arc<AtomicUsize>,
    played: Arc<AtomicUsize>,
}

impl CountingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the capability was acquired.
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// How many cues were played.
    pub fn played(&self) -> usize {
        self.played.load(Ordering::SeqCst)
    }
}

impl ToneBackend for CountingBackend {
    fn name(&self) -> &str {
        "counting"
    }

    fn open(&mut self, _spec: &ToneSpec) -> Result<Box<dyn Chime>, AudioError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CountingChime {
            played: Arc::clone(&self.played),
        }))
    }
}

struct CountingChime {
    played: Arc<AtomicUsize>,
}

impl Chime for CountingChime {
    fn play(&mut self) -> Result<(), AudioError> {
        self.played.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
