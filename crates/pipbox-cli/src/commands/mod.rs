pub mod config;
pub mod format;
pub mod presets;
pub mod run;
pub mod simulate;

use pipbox_core::{Preset, PRESETS};

/// Accept only durations from the preset catalog.
pub fn parse_preset(value: &str) -> Result<u64, String> {
    let valid = || {
        PRESETS
            .iter()
            .map(|p| p.seconds.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let seconds: u64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a number of seconds (valid: {})", valid()))?;
    Preset::find(seconds)
        .map(|p| p.seconds)
        .ok_or_else(|| format!("{seconds} is not a preset (valid: {})", valid()))
}
