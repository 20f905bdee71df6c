//! Interactive terminal widget.
//!
//! The engine owns all timing. This loop only waits on two things, ticks
//! from the interval scheduler and lines from stdin, and redraws after each.

use std::io::Write;

use pipbox_core::{
    format_clock, Config, CountdownEngine, DisplayState, Event, IntervalScheduler, RunStateKind,
    PRESETS,
};
use tokio::io::{AsyncBufReadExt, BufReader};

const TAGLINE: &str = "Small steps matter.";
const HELP: &str = "[enter/t] play/pause  [s] stop  [1-4] preset  [q] quit";

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Toggle,
    Stop,
    Preset(u64),
    Quit,
}

impl Input {
    pub fn parse(line: &str) -> Option<Input> {
        match line.trim() {
            "" | "t" | "p" => Some(Input::Toggle),
            "s" => Some(Input::Stop),
            "q" => Some(Input::Quit),
            other => other
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| PRESETS.get(i))
                .map(|p| Input::Preset(p.seconds)),
        }
    }
}

/// Render one frame of the widget.
pub fn frame(view: &DisplayState) -> String {
    let control = match view.run_state {
        RunStateKind::Running => "|| pause",
        _ if view.paused => "> resume",
        _ => "> start",
    };
    let stop = if view.can_stop { "  [] stop" } else { "" };
    let presets = view
        .available_presets
        .iter()
        .map(|p| {
            if view.selected_preset == Some(p.seconds) {
                format!("*{}*", p.label)
            } else {
                format!(" {} ", p.label)
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!("{}  {}{}  |{}|", view.formatted_time, control, stop, presets)
}

/// Overwrite the current line with a fresh frame.
fn draw<W: Write>(out: &mut W, engine: &CountdownEngine) -> std::io::Result<()> {
    write!(out, "\r{}", frame(&engine.display_state()))?;
    out.flush()
}

fn announce(event: &Event) {
    tracing::info!(event = event.kind(), "timer event");
    if let Event::TimerCompleted { total_secs, .. } = event {
        println!("\n{} session complete. {}", format_clock(*total_secs), TAGLINE);
    }
}

pub async fn run(preset: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let (scheduler, mut ticks) = IntervalScheduler::new();
    let mut engine = CountdownEngine::from_config(&config, Box::new(scheduler));
    if let Some(seconds) = preset {
        engine.select_preset(seconds);
    }

    println!("PipBox live timer. {HELP}");
    draw(&mut std::io::stdout(), &engine)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(tick) = ticks.recv() => {
                if let Some(event) = engine.on_tick(tick) {
                    announce(&event);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let event = match Input::parse(&line) {
                    Some(Input::Toggle) => engine.toggle(),
                    Some(Input::Stop) => engine.stop(),
                    Some(Input::Preset(seconds)) => engine.select_preset(seconds),
                    Some(Input::Quit) => break,
                    None => {
                        println!("{HELP}");
                        None
                    }
                };
                if let Some(event) = event {
                    announce(&event);
                }
            }
        }
        draw(&mut std::io::stdout(), &engine)?;
    }

    engine.stop();
    println!("\n{TAGLINE}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipbox_core::{LazyTone, ManualScheduler, ToneSpec};
    use pipbox_core::audio::SilentBackend;

    fn engine(total: u64) -> CountdownEngine {
        CountdownEngine::with_duration(
            total,
            Box::new(ManualScheduler::new()),
            LazyTone::new(Box::new(SilentBackend), ToneSpec::default()),
        )
    }

    #[test]
    fn parse_maps_keys() {
        assert_eq!(Input::parse(""), Some(Input::Toggle));
        assert_eq!(Input::parse(" t \n"), Some(Input::Toggle));
        assert_eq!(Input::parse("s"), Some(Input::Stop));
        assert_eq!(Input::parse("q"), Some(Input::Quit));
        assert_eq!(Input::parse("1"), Some(Input::Preset(300)));
        assert_eq!(Input::parse("4"), Some(Input::Preset(1205)));
        assert_eq!(Input::parse("0"), None);
        assert_eq!(Input::parse("5"), None);
        assert_eq!(Input::parse("x"), None);
    }

    #[test]
    fn frame_shows_clock_controls_and_selection() {
        let mut engine = engine(600);
        let idle = frame(&engine.display_state());
        assert!(idle.starts_with("10:00  > start"));
        assert!(idle.contains("*10:00*"));
        assert!(!idle.contains("stop"));

        engine.start();
        engine.tick();
        let running = frame(&engine.display_state());
        assert!(running.starts_with("09:59  || pause  [] stop"));

        engine.pause();
        assert!(frame(&engine.display_state()).contains("> resume"));
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn draw_reports_write_errors() {
        let engine = engine(300);
        let err = draw(&mut ClosedPipe, &engine).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn draw_writes_carriage_return_and_frame() {
        let engine = engine(300);
        let mut out = Vec::new();
        draw(&mut out, &engine).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\r05:00  > start"));
    }
}
