//! Drive the engine through a scripted sequence without waiting on the
//! clock, then print where it ended up.

use pipbox_core::audio::CountingBackend;
use pipbox_core::{Config, CountdownEngine, DisplayState, Event, LazyTone, ManualScheduler};
use serde::Serialize;

use super::parse_preset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Toggle,
    Start,
    Pause,
    Stop,
    Tick(u64),
    Preset(u64),
}

impl std::str::FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            None => match s {
                "toggle" => Ok(Step::Toggle),
                "start" => Ok(Step::Start),
                "pause" => Ok(Step::Pause),
                "stop" => Ok(Step::Stop),
                "tick" => Ok(Step::Tick(1)),
                other => Err(format!("unknown step '{other}'")),
            },
            Some(("tick", n)) => n
                .parse()
                .map(Step::Tick)
                .map_err(|_| format!("bad tick count '{n}'")),
            Some(("preset", secs)) => parse_preset(secs).map(Step::Preset),
            Some(_) => Err(format!("unknown step '{s}'")),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub display: DisplayState,
    pub events: Vec<&'static str>,
    pub completions: usize,
    pub tone_acquired: bool,
    pub tones_played: usize,
    pub live_schedules: usize,
}

pub fn simulate(total_secs: u64, steps: &[Step]) -> Report {
    let scheduler = ManualScheduler::new();
    let tone = CountingBackend::new();
    let lazy = LazyTone::new(Box::new(tone.clone()), Config::default().tone.spec());
    let mut engine = CountdownEngine::with_duration(total_secs, Box::new(scheduler.clone()), lazy);

    let mut events = Vec::new();
    for step in steps {
        match *step {
            Step::Toggle => events.extend(engine.toggle()),
            Step::Start => events.extend(engine.start()),
            Step::Pause => events.extend(engine.pause()),
            Step::Stop => events.extend(engine.stop()),
            Step::Preset(seconds) => events.extend(engine.select_preset(seconds)),
            Step::Tick(n) => {
                // Ticks only count while running.
                for _ in 0..n {
                    if !engine.is_running() {
                        break;
                    }
                    events.extend(engine.tick());
                }
            }
        }
    }

    Report {
        display: engine.display_state(),
        completions: events
            .iter()
            .filter(|e| matches!(e, Event::TimerCompleted { .. }))
            .count(),
        events: events.iter().map(Event::kind).collect(),
        tone_acquired: engine.tone_acquired(),
        tones_played: tone.played(),
        live_schedules: scheduler.live_count(),
    }
}

pub fn run(preset: Option<u64>, steps: Vec<Step>) -> Result<(), Box<dyn std::error::Error>> {
    let total = match preset {
        Some(seconds) => seconds,
        None => Config::load_or_default().timer.default_duration_secs,
    };
    let report = simulate(total, &steps);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipbox_core::RunStateKind;

    fn steps(script: &[&str]) -> Vec<Step> {
        script.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn parses_steps() {
        assert_eq!("toggle".parse::<Step>(), Ok(Step::Toggle));
        assert_eq!("tick".parse::<Step>(), Ok(Step::Tick(1)));
        assert_eq!("tick:30".parse::<Step>(), Ok(Step::Tick(30)));
        assert_eq!("preset:900".parse::<Step>(), Ok(Step::Preset(900)));
        assert!("preset:901".parse::<Step>().is_err());
        assert!("tick:x".parse::<Step>().is_err());
        assert!("jump".parse::<Step>().is_err());
    }

    #[test]
    fn full_run_fires_one_tone() {
        let report = simulate(1500, &steps(&["toggle", "tick:1500", "tick:5"]));
        assert_eq!(report.display.formatted_time, "00:00");
        assert_eq!(report.display.run_state, RunStateKind::Finished);
        assert_eq!(report.completions, 1);
        assert_eq!(report.tones_played, 1);
        assert_eq!(report.live_schedules, 0);
        assert_eq!(report.events, vec!["TimerStarted", "TimerCompleted"]);
    }

    #[test]
    fn huge_tick_count_stops_at_completion() {
        let report = simulate(300, &[Step::Start, Step::Tick(u64::MAX)]);
        assert_eq!(report.display.formatted_time, "00:00");
        assert_eq!(report.completions, 1);
        assert_eq!(report.tones_played, 1);
    }

    #[test]
    fn ticks_while_idle_change_nothing() {
        let report = simulate(600, &[Step::Tick(u64::MAX)]);
        assert_eq!(report.display.remaining_secs, 600);
        assert!(report.events.is_empty());
    }

    #[test]
    fn preset_mid_run_resets_and_stops_ticking() {
        let report = simulate(300, &steps(&["start", "tick:258", "preset:600", "tick:10"]));
        assert_eq!(report.display.remaining_secs, 600);
        assert_eq!(report.display.run_state, RunStateKind::Idle);
        assert_eq!(report.live_schedules, 0);
        assert!(report.tone_acquired);
        assert_eq!(report.tones_played, 0);
    }
}
