use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time source. `now` is measured from an arbitrary, fixed origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_ms(&self, ms: f64) {
        self.advance(Duration::from_secs_f64(ms.max(0.0) / 1000.0));
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Stopwatch over an external clock reading.
///
/// An unstarted timer reports zero elapsed time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElapsedTimer {
    started: Option<Duration>,
}

impl ElapsedTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, now: Duration) {
        self.started = Some(now);
    }

    pub fn is_valid(&self) -> bool {
        self.started.is_some()
    }

    pub fn elapsed(&self, now: Duration) -> Duration {
        self.started
            .map(|started| now.saturating_sub(started))
            .unwrap_or_default()
    }

    /// Returns the time since the last start and starts again from `now`.
    pub fn restart(&mut self, now: Duration) -> Duration {
        let elapsed = self.elapsed(now);
        self.started = Some(now);
        elapsed
    }

    pub fn invalidate(&mut self) {
        self.started = None;
    }
}

/// A timer that fires at most once per `schedule_once`.
///
/// The timer never calls back by itself; the owning event loop hands it the
/// current time through [`SingleShotTimer::poll`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleShotTimer {
    deadline: Option<Duration>,
    interval: Duration,
}

impl SingleShotTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_once(&mut self, now: Duration, delay: Duration) {
        self.interval = delay;
        self.deadline = Some(now + delay);
        log::trace!("single shot scheduled in {delay:?}");
    }

    /// Re-arms an active timer with a new delay counted from `now`.
    /// Inactive timers stay inactive.
    pub fn restart(&mut self, now: Duration, delay: Duration) -> bool {
        if self.deadline.is_none() {
            self.interval = delay;
            return false;
        }
        self.schedule_once(now, delay);
        true
    }

    pub fn cancel(&mut self) -> bool {
        let was_active = self.deadline.take().is_some();
        if was_active {
            log::trace!("single shot cancelled");
        }
        was_active
    }

    pub fn is_active(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    pub fn remaining(&self, now: Duration) -> Option<Duration> {
        self.deadline.map(|deadline| deadline.saturating_sub(now))
    }

    /// Fires the timer if its deadline has passed. Returns `true` exactly once
    /// per schedule.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

pub fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

pub fn from_millis(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::from_secs_f64(ms / 1000.0)
    } else {
        Duration::ZERO
    }
}
