use std::time::Duration;
use timing::{from_millis, millis, Clock, ElapsedTimer, ManualClock, SingleShotTimer};

#[test]
fn manual_clock_clones_share_time() {
    let clock = ManualClock::new();
    let other = clock.clone();
    clock.advance(Duration::from_millis(25));
    assert_eq!(other.now(), Duration::from_millis(25));
    other.set(Duration::from_secs(1));
    assert_eq!(clock.now(), Duration::from_secs(1));
}

#[test]
fn elapsed_timer_restart_reports_span() {
    let clock = ManualClock::new();
    let mut timer = ElapsedTimer::new();
    assert!(!timer.is_valid());
    assert_eq!(timer.elapsed(clock.now()), Duration::ZERO);

    timer.start(clock.now());
    clock.advance(Duration::from_millis(16));
    assert_eq!(timer.restart(clock.now()), Duration::from_millis(16));
    clock.advance(Duration::from_millis(4));
    assert_eq!(timer.elapsed(clock.now()), Duration::from_millis(4));
}

#[test]
fn single_shot_fires_once() {
    let mut timer = SingleShotTimer::new();
    timer.schedule_once(Duration::ZERO, Duration::from_millis(10));
    assert!(timer.is_active());
    assert!(!timer.poll(Duration::from_millis(9)));
    assert!(timer.poll(Duration::from_millis(10)));
    assert!(!timer.is_active());
    assert!(!timer.poll(Duration::from_millis(20)));
}

#[test]
fn cancel_prevents_fire() {
    let mut timer = SingleShotTimer::new();
    timer.schedule_once(Duration::ZERO, Duration::from_millis(10));
    assert!(timer.cancel());
    assert!(!timer.cancel());
    assert!(!timer.poll(Duration::from_millis(50)));
}

#[test]
fn restart_only_rearms_active_timer() {
    let mut timer = SingleShotTimer::new();
    assert!(!timer.restart(Duration::ZERO, Duration::from_millis(5)));
    assert!(!timer.is_active());

    timer.schedule_once(Duration::ZERO, Duration::from_millis(100));
    assert!(timer.restart(Duration::from_millis(10), Duration::from_millis(5)));
    assert_eq!(timer.deadline(), Some(Duration::from_millis(15)));
    assert_eq!(
        timer.remaining(Duration::from_millis(12)),
        Some(Duration::from_millis(3))
    );
}

#[test]
fn millis_conversions() {
    assert!((millis(Duration::from_micros(1500)) - 1.5).abs() < 1e-9);
    assert_eq!(from_millis(-3.0), Duration::ZERO);
    assert_eq!(from_millis(f64::NAN), Duration::ZERO);
    assert_eq!(from_millis(20.0), Duration::from_millis(20));
}
