use crate::canvas::Canvas;
use crate::history::RollingAverage;
use crate::registry::PlotId;
use crate::{require_positive, PlotError};
use std::time::Duration;
use timing::{from_millis, millis, Clock, ElapsedTimer, SingleShotTimer};

/// Number of frames the performance averages span.
pub const FPS_HISTORY_DEPTH: usize = 10;
pub const DEFAULT_REFRESH_HZ: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerConfig {
    pub refresh_hz: f64,
    /// Collapse repaint requests into at most one frame per pacing interval.
    /// When off, every request repaints synchronously.
    pub coalesce: bool,
    pub show_statistics: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            refresh_hz: DEFAULT_REFRESH_HZ,
            coalesce: true,
            show_statistics: false,
        }
    }
}

/// Averaged rendering performance over the last [`FPS_HISTORY_DEPTH`] frames.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStatistics {
    pub instrument_cycle_ms: f64,
    pub instrument_fps: f64,
    pub theoretical_fps: f64,
    pub repaint_ms: f64,
    pub frames: u64,
}

/// Decouples "data changed" notifications from canvas repaints.
pub struct FrameScheduler<C: Canvas> {
    id: PlotId,
    canvas: C,
    clock: Box<dyn Clock>,
    refresh_hz: f64,
    coalesce: bool,
    started: bool,
    show_statistics: bool,
    replot_timer: SingleShotTimer,
    fps_timer: ElapsedTimer,
    last_frame: Option<Duration>,
    frames: u64,
    instrument_cycle: RollingAverage,
    instrument_fps: RollingAverage,
    theoretical_fps: RollingAverage,
    repaint_duration: RollingAverage,
}

impl<C: Canvas> FrameScheduler<C> {
    /// Builds a stopped scheduler and paints the canvas once.
    pub fn new(
        id: PlotId,
        canvas: C,
        clock: Box<dyn Clock>,
        config: SchedulerConfig,
    ) -> Result<Self, PlotError> {
        let refresh_hz = require_positive("refresh_hz", config.refresh_hz)?;
        let mut scheduler = Self {
            id,
            canvas,
            clock,
            refresh_hz,
            coalesce: config.coalesce,
            started: false,
            show_statistics: config.show_statistics,
            replot_timer: SingleShotTimer::new(),
            fps_timer: ElapsedTimer::new(),
            last_frame: None,
            frames: 0,
            instrument_cycle: RollingAverage::new(FPS_HISTORY_DEPTH),
            instrument_fps: RollingAverage::new(FPS_HISTORY_DEPTH),
            theoretical_fps: RollingAverage::new(FPS_HISTORY_DEPTH),
            repaint_duration: RollingAverage::new(FPS_HISTORY_DEPTH),
        };
        log::debug!("{} - created plot ({})", id, scheduler.canvas.backend().label());
        scheduler.repaint_now();
        Ok(scheduler)
    }

    pub fn id(&self) -> PlotId {
        self.id
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn frame_interval(&self) -> Duration {
        from_millis(1000.0 / self.refresh_hz)
    }

    pub fn refresh_rate(&self) -> f64 {
        self.refresh_hz
    }

    /// Changes the pacing rate. A pending frame is re-armed with the new
    /// interval; it is not duplicated or dropped.
    pub fn set_refresh_rate(&mut self, hz: f64) -> Result<(), PlotError> {
        self.refresh_hz = require_positive("refresh_hz", hz)?;
        let now = self.clock.now();
        let interval = self.frame_interval();
        if self.replot_timer.restart(now, interval) {
            log::trace!("{} - pending frame re-armed at {hz} Hz", self.id);
        }
        Ok(())
    }

    pub fn configure(&mut self, target_frame_rate: f64) -> Result<(), PlotError> {
        self.set_refresh_rate(target_frame_rate)
    }

    pub fn is_coalescing(&self) -> bool {
        self.coalesce
    }

    pub fn set_coalescing(&mut self, coalesce: bool) {
        self.coalesce = coalesce;
        if !coalesce && self.replot_timer.cancel() {
            self.repaint_now();
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_repaint_pending(&self) -> bool {
        self.replot_timer.is_active()
    }

    /// Starts a fresh session with empty statistics.
    pub fn start(&mut self) {
        if self.show_statistics {
            log::debug!(
                "{} - starting free running plot at {} Hz",
                self.id,
                self.refresh_hz
            );
        }
        self.instrument_cycle.clear_history();
        self.instrument_fps.clear_history();
        self.theoretical_fps.clear_history();
        self.repaint_duration.clear_history();
        self.started = true;
    }

    /// Cancels the pending frame and flushes the current state with one final
    /// repaint.
    pub fn stop(&mut self) {
        if self.show_statistics {
            log::debug!("{} - stopping free running plot, forcing one replot", self.id);
        }
        self.started = false;
        self.replot_timer.cancel();
        self.repaint_now();
    }

    pub fn start_stop(&mut self, enabled: bool) {
        if enabled {
            self.start();
        } else {
            self.stop();
        }
    }

    /// Signals that the plotted data changed. Dropped while stopped.
    pub fn request_repaint(&mut self) {
        if !self.started {
            return;
        }
        if !self.coalesce {
            self.repaint_now();
            return;
        }
        if self.replot_timer.is_active() {
            if self.show_statistics {
                log::trace!("{} - replot already scheduled", self.id);
            }
            return;
        }
        let now = self.clock.now();
        let interval = self.frame_interval();
        self.replot_timer.schedule_once(now, interval);
    }

    /// Fires the pending frame if it is due at `now`.
    pub fn poll(&mut self, now: Duration) -> bool {
        if self.replot_timer.poll(now) {
            self.repaint_now();
            true
        } else {
            false
        }
    }

    pub fn tick(&mut self) -> bool {
        let now = self.clock.now();
        self.poll(now)
    }

    /// How long the event loop may idle before the pending frame is due.
    pub fn time_until_next_frame(&self) -> Option<Duration> {
        self.replot_timer.remaining(self.clock.now())
    }

    pub fn statistics_visible(&self) -> bool {
        self.show_statistics
    }

    /// Shows or hides the overlay; verbose statistics logging follows it.
    ///
    /// A change is presented right away, running or not.
    pub fn set_statistics_visible(&mut self, visible: bool) {
        if self.show_statistics == visible {
            return;
        }
        self.show_statistics = visible;
        self.repaint_now();
    }

    pub fn show_statistics(&mut self) {
        self.set_statistics_visible(true);
    }

    pub fn hide_statistics(&mut self) {
        self.set_statistics_visible(false);
    }

    pub fn last_frame(&self) -> Option<Duration> {
        self.last_frame
    }

    pub fn statistics(&self) -> FrameStatistics {
        FrameStatistics {
            instrument_cycle_ms: self.instrument_cycle.average(),
            instrument_fps: self.instrument_fps.average(),
            theoretical_fps: self.theoretical_fps.average(),
            repaint_ms: self.repaint_duration.average(),
            frames: self.frames,
        }
    }

    /// Repaints synchronously and records frame timings.
    ///
    /// The overlay is staged before drawing, so it shows the averages over the
    /// frames completed before this one.
    pub fn repaint_now(&mut self) {
        let cycle = self.fps_timer.restart(self.clock.now());

        let overlay = self.show_statistics.then(|| self.overlay_text());
        self.canvas.staged().overlay = overlay;
        self.canvas.repaint_now();

        let finished = self.clock.now();
        let repaint = self.fps_timer.restart(finished);
        self.last_frame = Some(finished);
        self.frames += 1;

        let repaint_ms = millis(repaint);
        let cycle_ms = millis(cycle) + repaint_ms;

        let cycle_avg = self.instrument_cycle.push_value_return_average(cycle_ms);
        let fps_avg = match per_second(cycle_ms) {
            Some(fps) => self.instrument_fps.push_value_return_average(fps),
            None => self.instrument_fps.average(),
        };
        let theoretical_avg = match per_second(repaint_ms) {
            Some(fps) => self.theoretical_fps.push_value_return_average(fps),
            None => self.theoretical_fps.average(),
        };
        let repaint_avg = self.repaint_duration.push_value_return_average(repaint_ms);

        if self.show_statistics {
            log::debug!(
                "{} - drawing plot - {fps_avg:.1} fps - {cycle_avg:.2} ms - {theoretical_avg:.1} fps theoretical - {repaint_avg:.2} ms avg frame time",
                self.id
            );
        }
    }

    fn overlay_text(&self) -> String {
        let stats = self.statistics();
        format!(
            "{}\ninstrument: {:.1} fps / {:.2} ms\nplot: {:.1} fps / {:.2} ms",
            self.canvas.backend().label(),
            stats.instrument_fps,
            stats.instrument_cycle_ms,
            stats.theoretical_fps,
            stats.repaint_ms
        )
    }
}

/// Rate for a span in milliseconds; spans too short to measure have none.
fn per_second(ms: f64) -> Option<f64> {
    (ms > 0.0).then(|| 1000.0 / ms)
}
