use serde::{Deserialize, Serialize};

/// Shape of the completion cue: a sine tone with a short linear attack and
/// an exponential decay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneSpec {
    pub frequency_hz: f32,
    /// Gain reached at the end of the attack.
    pub peak_gain: f32,
    /// Gain at the very end of the tone.
    pub floor_gain: f32,
    pub attack_ms: u32,
    pub duration_ms: u32,
}

impl Default for ToneSpec {
    fn default() -> Self {
        Self {
            frequency_hz: 880.0,
            peak_gain: 0.1,
            floor_gain: 0.01,
            attack_ms: 100,
            duration_ms: 1000,
        }
    }
}

impl ToneSpec {
    /// Envelope gain at `t_ms` milliseconds into the tone.
    pub fn gain_at(&self, t_ms: f32) -> f32 {
        let attack = self.attack_ms as f32;
        let total = self.duration_ms.max(self.attack_ms) as f32;
        if t_ms <= 0.0 {
            return 0.0;
        }
        if t_ms < attack {
            return self.peak_gain * (t_ms / attack);
        }
        if t_ms >= total || total <= attack {
            return self.floor_gain;
        }
        // Exponential ramps cannot pass through zero.
        let peak = self.peak_gain.max(f32::EPSILON);
        let floor = self.floor_gain.max(f32::EPSILON);
        let progress = (t_ms - attack) / (total - attack);
        peak * (floor / peak).powf(progress)
    }

    pub fn sample_count(&self, sample_rate: u32) -> usize {
        (u64::from(self.duration_ms) * u64::from(sample_rate) / 1000) as usize
    }

    /// Mono samples in `[-1.0, 1.0]`.
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let rate = sample_rate as f32;
        let omega = std::f32::consts::TAU * self.frequency_hz;
        (0..self.sample_count(sample_rate))
            .map(|i| {
                let t = i as f32 / rate;
                (omega * t).sin() * self.gain_at(t * 1000.0)
            })
            .collect()
    }
}
