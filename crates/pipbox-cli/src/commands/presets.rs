use pipbox_core::{Config, PRESETS};

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&PRESETS)?);
        return Ok(());
    }

    let default_secs = Config::load_or_default().timer.default_duration_secs;
    for (i, preset) in PRESETS.iter().enumerate() {
        let marker = if preset.seconds == default_secs { " (default)" } else { "" };
        println!("[{}] {}  {}s{}", i + 1, preset.label, preset.seconds, marker);
    }
    Ok(())
}
