use sismo_core::{
    FrameScheduler, HeadlessCanvas, PlotError, PlotId, RenderBackend, RollingAverage,
    SchedulerConfig, FPS_HISTORY_DEPTH,
};
use std::time::Duration;
use timing::ManualClock;

fn scheduler_at(hz: f64, coalesce: bool) -> (FrameScheduler<HeadlessCanvas>, ManualClock) {
    let clock = ManualClock::new();
    let scheduler = FrameScheduler::new(
        PlotId(7),
        HeadlessCanvas::new(RenderBackend::Software),
        Box::new(clock.clone()),
        SchedulerConfig {
            refresh_hz: hz,
            coalesce,
            show_statistics: false,
        },
    )
    .expect("valid scheduler");
    (scheduler, clock)
}

#[test]
fn construction_paints_once() {
    let (scheduler, _clock) = scheduler_at(60.0, true);
    assert_eq!(scheduler.canvas().repaints(), 1);
    assert!(!scheduler.is_started());
    assert!(!scheduler.is_repaint_pending());
}

#[test]
fn rejects_non_positive_rate() {
    let clock = ManualClock::new();
    let err = FrameScheduler::new(
        PlotId(0),
        HeadlessCanvas::default(),
        Box::new(clock),
        SchedulerConfig {
            refresh_hz: 0.0,
            ..SchedulerConfig::default()
        },
    )
    .err();
    assert!(matches!(
        err,
        Some(PlotError::InvalidConfiguration {
            field: "refresh_hz",
            ..
        })
    ));

    let (mut scheduler, _clock) = scheduler_at(50.0, true);
    assert!(scheduler.configure(-1.0).is_err());
    assert!(scheduler.set_refresh_rate(f64::NAN).is_err());
    assert_eq!(scheduler.refresh_rate(), 50.0);
}

#[test]
fn requests_coalesce_to_one_frame_per_interval() {
    let (mut scheduler, clock) = scheduler_at(50.0, true);
    scheduler.start();

    for _ in 0..10 {
        for _ in 0..5 {
            scheduler.request_repaint();
            assert!(!scheduler.tick());
            clock.advance(Duration::from_millis(2));
        }
        assert!(scheduler.is_repaint_pending());
        clock.advance(Duration::from_millis(10));
        assert!(scheduler.tick());
        assert!(!scheduler.tick());
    }

    assert_eq!(scheduler.canvas().repaints(), 1 + 10);
}

#[test]
fn time_until_next_frame_counts_down() {
    let (mut scheduler, clock) = scheduler_at(50.0, true);
    scheduler.start();
    assert_eq!(scheduler.time_until_next_frame(), None);
    scheduler.request_repaint();
    clock.advance(Duration::from_millis(5));
    assert_eq!(
        scheduler.time_until_next_frame(),
        Some(Duration::from_millis(15))
    );
}

#[test]
fn stop_flushes_and_silences_until_start() {
    let (mut scheduler, clock) = scheduler_at(50.0, true);
    scheduler.start();
    scheduler.request_repaint();
    scheduler.stop();
    assert_eq!(scheduler.canvas().repaints(), 2);
    assert!(!scheduler.is_repaint_pending());

    for _ in 0..5 {
        scheduler.request_repaint();
    }
    clock.advance(Duration::from_millis(100));
    assert!(!scheduler.tick());
    assert_eq!(scheduler.canvas().repaints(), 2);

    scheduler.start();
    scheduler.request_repaint();
    clock.advance(Duration::from_millis(20));
    assert!(scheduler.tick());
    assert_eq!(scheduler.canvas().repaints(), 3);
}

#[test]
fn immediate_mode_repaints_every_request() {
    let (mut scheduler, _clock) = scheduler_at(50.0, false);
    scheduler.start_stop(true);
    for _ in 0..4 {
        scheduler.request_repaint();
    }
    assert_eq!(scheduler.canvas().repaints(), 5);
    assert!(!scheduler.is_repaint_pending());
}

#[test]
fn new_rate_rearms_pending_frame() {
    let (mut scheduler, clock) = scheduler_at(50.0, true);
    scheduler.start();
    scheduler.request_repaint();
    clock.advance(Duration::from_millis(5));
    scheduler.set_refresh_rate(10.0).expect("valid rate");
    assert!(scheduler.is_repaint_pending());

    clock.advance(Duration::from_millis(25));
    assert!(!scheduler.tick());
    clock.advance(Duration::from_millis(75));
    assert!(scheduler.tick());
    assert_eq!(scheduler.canvas().repaints(), 2);
}

#[test]
fn statistics_follow_frame_cadence() {
    let (mut scheduler, clock) = scheduler_at(50.0, true);
    scheduler.start();
    for _ in 0..3 {
        scheduler.request_repaint();
        clock.advance(Duration::from_millis(20));
        scheduler.tick();
    }
    let stats = scheduler.statistics();
    assert!((stats.instrument_cycle_ms - 20.0).abs() < 1e-6);
    assert!((stats.instrument_fps - 50.0).abs() < 1e-6);
    assert_eq!(stats.frames, 4);

    scheduler.start();
    let stats = scheduler.statistics();
    assert_eq!(stats.instrument_cycle_ms, 0.0);
    assert_eq!(stats.instrument_fps, 0.0);
    assert_eq!(stats.repaint_ms, 0.0);
}

fn presented_overlay(scheduler: &FrameScheduler<HeadlessCanvas>) -> Option<String> {
    scheduler.canvas().presented().overlay.clone()
}

#[test]
fn overlay_is_presented_with_its_frame() {
    let (mut scheduler, clock) = scheduler_at(50.0, true);
    scheduler.show_statistics();
    scheduler.start();
    for _ in 0..2 {
        scheduler.request_repaint();
        clock.advance(Duration::from_millis(20));
        scheduler.tick();
    }

    let overlay = presented_overlay(&scheduler).expect("overlay text");
    assert!(overlay.starts_with("Software rendering"));
    assert!(overlay.contains("instrument: 50.0 fps / 20.00 ms"));
    assert!(overlay.contains("\nplot: "));
}

#[test]
fn statistics_visibility_applies_while_stopped() {
    let (mut scheduler, clock) = scheduler_at(50.0, true);
    scheduler.show_statistics();
    scheduler.start();
    for _ in 0..2 {
        scheduler.request_repaint();
        clock.advance(Duration::from_millis(20));
        scheduler.tick();
    }
    scheduler.stop();
    assert!(presented_overlay(&scheduler).is_some());

    scheduler.hide_statistics();
    assert!(!scheduler.statistics_visible());
    assert_eq!(presented_overlay(&scheduler), None);

    scheduler.request_repaint();
    clock.advance(Duration::from_millis(100));
    scheduler.tick();
    assert_eq!(presented_overlay(&scheduler), None);

    scheduler.show_statistics();
    assert!(presented_overlay(&scheduler).is_some());
}

#[test]
fn immediate_overlay_lists_all_averages() {
    let (mut scheduler, clock) = scheduler_at(50.0, false);
    scheduler.set_statistics_visible(true);
    scheduler.start();
    clock.advance(Duration::from_millis(10));
    scheduler.request_repaint();

    let overlay = presented_overlay(&scheduler).expect("overlay text");
    assert!(overlay.contains("instrument: "));
    assert!(overlay.contains("plot: "));
}

#[test]
fn history_average_excludes_evicted_measurement() {
    let mut history = RollingAverage::new(FPS_HISTORY_DEPTH);
    history.push_value_return_average(1_000.0);
    for _ in 0..FPS_HISTORY_DEPTH {
        history.push_value_return_average(10.0);
    }
    assert_eq!(history.len(), FPS_HISTORY_DEPTH);
    assert!((history.average() - 10.0).abs() < 1e-12);

    history.clear_history();
    assert!(history.is_empty());
    assert_eq!(history.average(), 0.0);
}
