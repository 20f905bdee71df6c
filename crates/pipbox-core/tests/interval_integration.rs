//! Integration tests for the engine on a real tokio interval, with paused
//! time so seconds pass instantly.

use std::time::Duration;

use pipbox_core::audio::CountingBackend;
use pipbox_core::{CountdownEngine, Event, IntervalScheduler, LazyTone, RunState, ToneSpec};

fn engine(total: u64) -> (CountdownEngine, tokio::sync::mpsc::UnboundedReceiver<pipbox_core::Tick>, CountingBackend) {
    let (scheduler, ticks) = IntervalScheduler::new();
    let tone = CountingBackend::new();
    let engine = CountdownEngine::with_duration(
        total,
        Box::new(scheduler),
        LazyTone::new(Box::new(tone.clone()), ToneSpec::default()),
    );
    (engine, ticks, tone)
}

#[tokio::test(start_paused = true)]
async fn counts_down_to_completion_in_real_seconds() {
    let (mut engine, mut ticks, tone) = engine(5);
    let began = tokio::time::Instant::now();
    engine.start();

    let mut completed = None;
    while completed.is_none() {
        let tick = ticks.recv().await.unwrap();
        completed = engine.on_tick(tick);
    }

    assert!(matches!(completed, Some(Event::TimerCompleted { .. })));
    assert_eq!(engine.state(), RunState::Finished);
    assert_eq!(tone.played(), 1);
    assert!(began.elapsed() >= Duration::from_secs(5));

    let more = tokio::time::timeout(Duration::from_secs(3), ticks.recv()).await;
    assert!(more.is_err(), "no ticks after completion");
}

#[tokio::test(start_paused = true)]
async fn pause_cancels_pending_tick() {
    let (mut engine, mut ticks, _) = engine(10);
    engine.start();
    let tick = ticks.recv().await.unwrap();
    engine.on_tick(tick);
    assert_eq!(engine.remaining_secs(), 9);

    engine.pause();
    let more = tokio::time::timeout(Duration::from_secs(5), ticks.recv()).await;
    assert!(more.is_err(), "no ticks while paused");
    assert_eq!(engine.remaining_secs(), 9);

    let resumed_at = tokio::time::Instant::now();
    engine.start();
    let tick = ticks.recv().await.unwrap();
    assert!(resumed_at.elapsed() >= Duration::from_secs(1));
    engine.on_tick(tick);
    assert_eq!(engine.remaining_secs(), 8);
}
