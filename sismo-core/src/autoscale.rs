use crate::scale::ScaleDiv;
use std::time::Duration;
use timing::SingleShotTimer;

/// Picks a display division out of a fixed set of candidates.
///
/// A value outside the active division grows the scale right away. Shrinking
/// only happens when the timeout period expires: the scaler then selects the
/// smallest candidate holding every value seen during that period.
#[derive(Debug, Clone)]
pub struct AutoScaler {
    divisions: Vec<ScaleDiv>,
    current: usize,
    timeout: Duration,
    timer: SingleShotTimer,
    min: f64,
    max: f64,
}

impl AutoScaler {
    /// Candidates are ordered by span, smallest first. An empty list falls
    /// back to a single `[-1, 1]` division.
    pub fn new(mut divisions: Vec<ScaleDiv>) -> Self {
        if divisions.is_empty() {
            divisions.push(ScaleDiv::divide(-1.0, 1.0, 5, 5));
        }
        divisions.sort_by(|a, b| a.span().total_cmp(&b.span()));
        Self {
            divisions,
            current: 0,
            timeout: Duration::ZERO,
            timer: SingleShotTimer::new(),
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub fn current(&self) -> &ScaleDiv {
        &self.divisions[self.current]
    }

    pub fn divisions(&self) -> &[ScaleDiv] {
        &self.divisions
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn is_timer_active(&self) -> bool {
        self.timer.is_active()
    }

    /// Begins a new observation period.
    pub fn start_timer(&mut self, now: Duration) {
        self.min = f64::INFINITY;
        self.max = f64::NEG_INFINITY;
        if self.timeout.is_zero() {
            self.timer.cancel();
        } else {
            self.timer.schedule_once(now, self.timeout);
        }
    }

    pub fn stop_timer(&mut self) {
        self.timer.cancel();
    }

    /// Records a value; returns the new division when it forced a larger scale.
    pub fn set_value(&mut self, value: f64) -> Option<ScaleDiv> {
        if !value.is_finite() {
            return None;
        }
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        if self.current().contains(value) {
            return None;
        }
        self.select(self.fitting(self.min, self.max))
    }

    /// Ends the observation period if it expired; returns the new division
    /// when the period's values fit a different one.
    pub fn poll(&mut self, now: Duration) -> Option<ScaleDiv> {
        if !self.timer.poll(now) {
            return None;
        }
        let seen = self.min <= self.max;
        let next = if seen {
            self.fitting(self.min, self.max)
        } else {
            self.current
        };
        self.start_timer(now);
        self.select(next)
    }

    fn fitting(&self, min: f64, max: f64) -> usize {
        self.divisions
            .iter()
            .position(|div| div.contains(min) && div.contains(max))
            .unwrap_or(self.divisions.len() - 1)
    }

    fn select(&mut self, idx: usize) -> Option<ScaleDiv> {
        if idx == self.current {
            return None;
        }
        self.current = idx;
        log::debug!(
            "autoscale to [{}, {}]",
            self.divisions[idx].lower,
            self.divisions[idx].upper
        );
        Some(self.divisions[idx].clone())
    }
}
