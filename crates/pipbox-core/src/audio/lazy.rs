use super::backend::{Chime, ToneBackend};
use super::tone::ToneSpec;

enum Slot {
    Pending,
    Ready(Box<dyn Chime>),
    Unavailable,
}

/// The completion-tone capability, acquired on first use and kept for the
/// life of its owner.
///
/// Acquisition is attempted once. A failure is remembered and every later
/// `play` is silent; nothing here ever returns an error.
pub struct LazyTone {
    backend: Box<dyn ToneBackend>,
    spec: ToneSpec,
    slot: Slot,
}

impl LazyTone {
    pub fn new(backend: Box<dyn ToneBackend>, spec: ToneSpec) -> Self {
        Self {
            backend,
            spec,
            slot: Slot::Pending,
        }
    }

    /// Open the backend if that has not been tried yet.
    pub fn acquire(&mut self) {
        if !matches!(self.slot, Slot::Pending) {
            return;
        }
        self.slot = match self.backend.open(&self.spec) {
            Ok(chime) => {
                tracing::debug!(backend = self.backend.name(), "tone capability acquired");
                Slot::Ready(chime)
            }
            Err(e) => {
                tracing::warn!(
                    backend = self.backend.name(),
                    error = %e,
                    "tone capability unavailable, completion will be silent"
                );
                Slot::Unavailable
            }
        };
    }

    pub fn is_acquired(&self) -> bool {
        matches!(self.slot, Slot::Ready(_))
    }

    /// Play the cue. Returns whether a cue was actually produced.
    pub fn play(&mut self) -> bool {
        match &mut self.slot {
            Slot::Ready(chime) => match chime.play() {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(error = %e, "completion tone failed");
                    false
                }
            },
            Slot::Pending | Slot::Unavailable => false,
        }
    }
}

impl std::fmt::Debug for LazyTone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = match self.slot {
            Slot::Pending => "pending",
            Slot::Ready(_) => "ready",
            Slot::Unavailable => "unavailable",
        };
        f.debug_struct("LazyTone")
            .field("backend", &self.backend.name())
            .field("slot", &slot)
            .finish()
    }
}
