//! Tone playback on the default output device.

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};

use super::backend::{Chime, ToneBackend};
use super::tone::ToneSpec;
use crate::error::AudioError;

const SAMPLE_RATE: u32 = 44_100;

#[derive(Debug)]
pub struct RodioBackend {
    sample_rate: u32,
}

impl Default for RodioBackend {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
        }
    }
}

impl ToneBackend for RodioBackend {
    fn name(&self) -> &str {
        "rodio"
    }

    fn open(&mut self, spec: &ToneSpec) -> Result<Box<dyn Chime>, AudioError> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| AudioError::DeviceUnavailable(e.to_string()))?;
        Ok(Box::new(RodioChime {
            _stream: stream,
            handle,
            samples: spec.render(self.sample_rate),
            sample_rate: self.sample_rate,
        }))
    }
}

/// Holds the output stream open for as long as the engine lives.
struct RodioChime {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Chime for RodioChime {
    fn play(&mut self) -> Result<(), AudioError> {
        let sink =
            Sink::try_new(&self.handle).map_err(|e| AudioError::Playback(e.to_string()))?;
        sink.append(SamplesBuffer::new(1, self.sample_rate, self.samples.clone()));
        sink.detach();
        Ok(())
    }
}
