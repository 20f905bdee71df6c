mod backend;
mod lazy;
#[cfg(feature = "audio")]
mod rodio_backend;
mod tone;

pub use backend::{
    backend_for, BackendKind, BellBackend, Chime, CountingBackend, SilentBackend, ToneBackend,
    UnavailableBackend,
};
pub use lazy::LazyTone;
#[cfg(feature = "audio")]
pub use rodio_backend::RodioBackend;
pub use tone::ToneSpec;
