use sismo_core::{AutoScaler, Listeners, ScaleDiv};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

fn decades() -> Vec<ScaleDiv> {
    vec![
        ScaleDiv::divide(-100.0, 100.0, 5, 5),
        ScaleDiv::divide(-1.0, 1.0, 5, 5),
        ScaleDiv::divide(-10.0, 10.0, 5, 5),
    ]
}

#[test]
fn candidates_sorted_by_span() {
    let scaler = AutoScaler::new(decades());
    let uppers: Vec<f64> = scaler.divisions().iter().map(|div| div.upper).collect();
    assert_eq!(uppers, vec![1.0, 10.0, 100.0]);
    assert_eq!(scaler.current().upper, 1.0);
}

#[test]
fn grows_immediately() {
    let mut scaler = AutoScaler::new(decades());
    assert_eq!(scaler.set_value(0.5), None);
    let grown = scaler.set_value(-7.0).expect("scale grows");
    assert_eq!(grown.lower, -10.0);
    assert_eq!(scaler.set_value(1e6).map(|div| div.upper), Some(100.0));
    assert_eq!(scaler.set_value(f64::NAN), None);
}

#[test]
fn shrinks_only_on_timeout() {
    let mut scaler = AutoScaler::new(decades());
    scaler.set_timeout(Duration::from_millis(500));
    scaler.start_timer(Duration::ZERO);
    scaler.set_value(50.0);
    assert_eq!(scaler.current().upper, 100.0);

    assert_eq!(scaler.poll(Duration::from_millis(100)), None);
    assert_eq!(scaler.poll(Duration::from_millis(500)), None);

    scaler.set_value(0.2);
    assert_eq!(scaler.current().upper, 100.0);
    let shrunk = scaler
        .poll(Duration::from_millis(1000))
        .expect("scale shrinks");
    assert_eq!(shrunk.upper, 1.0);
    assert!(scaler.is_timer_active());
}

#[test]
fn quiet_period_keeps_scale() {
    let mut scaler = AutoScaler::new(decades());
    scaler.set_timeout(Duration::from_millis(10));
    scaler.set_value(5.0);
    scaler.start_timer(Duration::ZERO);
    assert_eq!(scaler.poll(Duration::from_millis(10)), None);
    assert_eq!(scaler.current().upper, 10.0);
}

#[test]
fn zero_timeout_disables_timer() {
    let mut scaler = AutoScaler::new(Vec::new());
    scaler.start_timer(Duration::ZERO);
    assert!(!scaler.is_timer_active());
    assert_eq!(scaler.current().upper, 1.0);
}

#[test]
fn listeners_run_synchronously_until_removed() {
    let mut listeners: Listeners<u32> = Listeners::new();
    let total = Rc::new(Cell::new(0));
    let sink = Rc::clone(&total);
    let id = listeners.subscribe(move |value| sink.set(sink.get() + *value));
    listeners.emit(&3);
    assert_eq!(total.get(), 3);

    assert!(listeners.unsubscribe(id));
    assert!(!listeners.unsubscribe(id));
    listeners.emit(&4);
    assert_eq!(total.get(), 3);
    assert!(listeners.is_empty());
}
