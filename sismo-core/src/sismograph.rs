use crate::autoscale::AutoScaler;
use crate::canvas::Canvas;
use crate::events::{ListenerId, Listeners, PlotEvent};
use crate::prefix::{format_value, MetricPrefix};
use crate::registry::PlotId;
use crate::scale::{scale_for, ScaleDiv};
use crate::scheduler::{FrameScheduler, SchedulerConfig};
use crate::settings::{PlotSettings, MAX_PRECISION};
use crate::style::{Color, LineStyle, TraceStyle, UnitOfMeasure};
use crate::{require_positive, PlotError};
use std::collections::VecDeque;
use timing::{from_millis, Clock};

/// Value-axis bound shown before the first rescale.
pub const INITIAL_SCALE_BOUND: f64 = 0.1;
/// Largest window a plot accepts.
pub const MAX_HISTORY_SAMPLES: usize = 10_000_000;
const MAJOR_TICKS: usize = 5;
const MINOR_TICKS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotState {
    Uninitialized,
    Configured,
    Running,
}

/// Rolling-window scope trace with automatic value-axis scaling.
///
/// Samples are kept in arrival order. Once the buffer reaches
/// `num_samples + 2` values the oldest one is evicted, so `num_samples + 1`
/// values (one per time-axis slot) are retained between pushes.
pub struct Sismograph<C: Canvas> {
    scheduler: FrameScheduler<C>,
    samples: VecDeque<f64>,
    time_axis: Vec<f64>,
    num_samples: usize,
    sample_rate: f64,
    current_scale: f64,
    current_max: f64,
    value_axis: ScaleDiv,
    time_bounds: (f64, f64),
    axis_title: String,
    unit: UnitOfMeasure,
    style: TraceStyle,
    precision: usize,
    scaler: AutoScaler,
    state: PlotState,
    listeners: Listeners<PlotEvent>,
}

impl<C: Canvas> Sismograph<C> {
    pub fn new(
        id: PlotId,
        canvas: C,
        clock: Box<dyn Clock>,
        config: SchedulerConfig,
    ) -> Result<Self, PlotError> {
        let scheduler = FrameScheduler::new(id, canvas, clock, config)?;
        let initial = ScaleDiv::divide(-INITIAL_SCALE_BOUND, INITIAL_SCALE_BOUND, 5, 5);
        let unit = UnitOfMeasure::default();
        let mut plot = Self {
            scheduler,
            samples: VecDeque::new(),
            time_axis: vec![0.0],
            num_samples: 0,
            sample_rate: 10.0,
            current_scale: f64::NEG_INFINITY,
            current_max: f64::NEG_INFINITY,
            value_axis: initial.clone(),
            time_bounds: (0.0, 0.0),
            axis_title: format!("{}({})", unit.name, unit.symbol),
            unit,
            style: TraceStyle::default(),
            precision: 3,
            scaler: AutoScaler::new(vec![initial]),
            state: PlotState::Uninitialized,
            listeners: Listeners::new(),
        };
        plot.stage_all();
        Ok(plot)
    }

    pub fn with_settings(
        id: PlotId,
        canvas: C,
        clock: Box<dyn Clock>,
        settings: &PlotSettings,
    ) -> Result<Self, PlotError> {
        let mut plot = Self::new(id, canvas, clock, settings.scheduler_config())?;
        plot.set_sample_rate(settings.sample_rate)?;
        plot.set_unit_of_measure(settings.unit.name.clone(), settings.unit.symbol.clone());
        plot.set_style(settings.trace_style());
        plot.set_precision(settings.precision);
        plot.set_history_duration(settings.history_seconds)?;
        Ok(plot)
    }

    pub fn id(&self) -> PlotId {
        self.scheduler.id()
    }

    pub fn scheduler(&self) -> &FrameScheduler<C> {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut FrameScheduler<C> {
        &mut self.scheduler
    }

    pub fn canvas(&self) -> &C {
        self.scheduler.canvas()
    }

    pub fn state(&self) -> PlotState {
        self.state
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&PlotEvent) + 'static) -> ListenerId {
        self.listeners.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn start(&mut self) {
        self.scheduler.start();
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Resizes the window, clears the buffer and rebuilds the time axis.
    /// Counts above [`MAX_HISTORY_SAMPLES`] are clamped.
    pub fn set_num_samples(&mut self, num_samples: usize) {
        let num_samples = if num_samples > MAX_HISTORY_SAMPLES {
            log::warn!(
                "{} - window of {num_samples} samples clamped to {MAX_HISTORY_SAMPLES}",
                self.id()
            );
            MAX_HISTORY_SAMPLES
        } else {
            num_samples
        };
        self.num_samples = num_samples;
        self.samples = VecDeque::with_capacity(num_samples + 2);
        self.current_max = f64::NEG_INFINITY;
        self.rebuild_time_axis();
        self.time_bounds = (num_samples as f64 / self.sample_rate, 0.0);
        self.scaler
            .set_timeout(from_millis(num_samples as f64 * 1000.0 / self.sample_rate));
        let now = self.scheduler.now();
        self.scaler.start_timer(now);
        self.state = PlotState::Configured;
        self.stage_all();
        self.listeners.emit(&PlotEvent::HistoryChanged { num_samples });
        self.scheduler.request_repaint();
    }

    /// Window length in seconds.
    ///
    /// When `seconds * sample_rate` rounds to zero the argument is taken as a
    /// raw sample count instead, never less than one. Windows longer than
    /// [`MAX_HISTORY_SAMPLES`] are rejected.
    pub fn set_history_duration(&mut self, seconds: f64) -> Result<(), PlotError> {
        let seconds = require_positive("history_seconds", seconds)?;
        let count = (seconds * self.sample_rate).round();
        let count = if count < 1.0 {
            log::warn!(
                "{} - {seconds} s at {} Hz spans no sample, using it as a sample count",
                self.id(),
                self.sample_rate
            );
            seconds.round().max(1.0)
        } else {
            count
        };
        if count > MAX_HISTORY_SAMPLES as f64 {
            log::warn!("rejected history_seconds = {seconds} ({count} samples)");
            return Err(PlotError::InvalidConfiguration {
                field: "history_seconds",
                value: seconds,
            });
        }
        self.set_num_samples(count as usize);
        Ok(())
    }

    pub fn history_duration(&self) -> f64 {
        self.num_samples as f64 / self.sample_rate
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Respaces the time axis. The sample buffer keeps its size and contents.
    pub fn set_sample_rate(&mut self, rate: f64) -> Result<(), PlotError> {
        self.sample_rate = require_positive("sample_rate", rate)?;
        self.rebuild_time_axis();
        self.time_bounds = (self.num_samples as f64 / rate, 0.0);
        self.stage_all();
        self.listeners.emit(&PlotEvent::SampleRateChanged(rate));
        self.scheduler.request_repaint();
        Ok(())
    }

    /// Clears the buffer and overrides the time-axis bounds.
    pub fn update_time_scale(&mut self, max: f64, min: f64) {
        self.reset();
        self.rebuild_time_axis();
        self.time_bounds = (max, min);
        self.stage_all();
        self.scheduler.request_repaint();
    }

    /// Drops all samples and restarts the autoscale period. Configuration is
    /// kept.
    pub fn reset(&mut self) {
        self.samples.clear();
        self.current_max = f64::NEG_INFINITY;
        let now = self.scheduler.now();
        self.scaler.start_timer(now);
        if self.state == PlotState::Running {
            self.state = PlotState::Configured;
        }
        self.publish_curve();
        self.listeners.emit(&PlotEvent::Reset);
    }

    pub fn push_sample(&mut self, value: f64) {
        self.samples.push_back(value);

        if self.samples.len() >= self.num_samples + 2 {
            let evicted = self.samples.pop_front();
            if evicted == Some(self.current_max) {
                self.recompute_scale();
            }
        }

        if value > self.current_max {
            self.recompute_scale();
        }

        if let Some(div) = self.scaler.set_value(value) {
            self.apply_value_axis(div);
        }
        self.state = PlotState::Running;
        self.publish_curve();
        self.scheduler.request_repaint();
    }

    pub fn plot(&mut self, sample: f64) {
        self.push_sample(sample);
    }

    /// Rescales the value axis to the decade holding the window maximum.
    /// A zero or empty window leaves the axis untouched.
    pub fn recompute_scale(&mut self) {
        let max = self.find_max();
        self.current_max = max;
        if !max.is_finite() || max == 0.0 {
            return;
        }
        let scale = scale_for(max);
        let prefix = MetricPrefix::for_value(max).symbol();
        self.axis_title = format!(
            "{prefix}{}({prefix}{})",
            self.unit.name, self.unit.symbol
        );
        self.current_scale = scale;
        self.apply_value_axis(ScaleDiv::divide(-scale, scale, MAJOR_TICKS, MINOR_TICKS));
    }

    /// Expires the autoscale period and fires a due repaint.
    pub fn tick(&mut self) -> bool {
        let now = self.scheduler.now();
        if let Some(div) = self.scaler.poll(now) {
            self.apply_value_axis(div);
            self.scheduler.request_repaint();
        }
        self.scheduler.poll(now)
    }

    /// Replaces the autoscaler's candidate divisions.
    pub fn set_autoscale_divisions(&mut self, divisions: Vec<ScaleDiv>) {
        let timeout = self.scaler.timeout();
        self.scaler = AutoScaler::new(divisions);
        self.scaler.set_timeout(timeout);
        let now = self.scheduler.now();
        self.scaler.start_timer(now);
    }

    pub fn autoscaler(&self) -> &AutoScaler {
        &self.scaler
    }

    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The most recent `num_samples` values.
    pub fn window(&self) -> Vec<f64> {
        let skip = self.samples.len().saturating_sub(self.num_samples);
        self.samples.iter().skip(skip).copied().collect()
    }

    pub fn time_axis(&self) -> &[f64] {
        &self.time_axis
    }

    pub fn time_bounds(&self) -> (f64, f64) {
        self.time_bounds
    }

    pub fn current_scale(&self) -> f64 {
        self.current_scale
    }

    pub fn current_max(&self) -> f64 {
        self.current_max
    }

    pub fn value_axis(&self) -> &ScaleDiv {
        &self.value_axis
    }

    pub fn axis_title(&self) -> &str {
        &self.axis_title
    }

    pub fn unit_of_measure(&self) -> &UnitOfMeasure {
        &self.unit
    }

    /// Takes effect on the next rescale.
    pub fn set_unit_of_measure(&mut self, name: impl Into<String>, symbol: impl Into<String>) {
        self.unit = UnitOfMeasure::new(name, symbol);
    }

    pub fn style(&self) -> TraceStyle {
        self.style
    }

    pub fn set_style(&mut self, style: TraceStyle) {
        self.style = style;
        self.scheduler.canvas_mut().staged().style = style;
        self.scheduler.request_repaint();
    }

    pub fn set_color(&mut self, color: Color) {
        self.style.color = color;
        self.scheduler.canvas_mut().staged().style = self.style;
        self.scheduler.request_repaint();
    }

    pub fn set_line_width(&mut self, width: f64) {
        if !(width.is_finite() && width > 0.0) {
            return;
        }
        self.style.width = width;
        self.scheduler.canvas_mut().staged().style = self.style;
    }

    pub fn set_line_style(&mut self, line_style: LineStyle) {
        self.style.line_style = line_style;
        self.scheduler.canvas_mut().staged().style = self.style;
        self.scheduler.request_repaint();
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    pub fn set_precision(&mut self, precision: usize) {
        self.precision = precision.min(MAX_PRECISION);
        self.listeners
            .emit(&PlotEvent::PrecisionChanged(self.precision));
    }

    /// Latest sample with its metric prefix and unit, e.g. `12.345 mV`.
    pub fn readout(&self) -> Option<String> {
        self.samples
            .back()
            .map(|value| format_value(*value, self.precision, &self.unit.symbol))
    }

    fn find_max(&self) -> f64 {
        self.samples
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    fn rebuild_time_axis(&mut self) {
        let n = self.num_samples;
        let rate = self.sample_rate;
        self.time_axis.clear();
        self.time_axis
            .extend((0..=n).map(|idx| (n - idx) as f64 / rate));
    }

    fn apply_value_axis(&mut self, div: ScaleDiv) {
        self.value_axis = div.clone();
        let frame = self.scheduler.canvas_mut().staged();
        frame.value_axis = div.clone();
        frame.value_title = self.axis_title.clone();
        self.listeners.emit(&PlotEvent::ScaleUpdated {
            div,
            title: self.axis_title.clone(),
        });
    }

    fn publish_curve(&mut self) {
        let offset = self.time_axis.len().saturating_sub(self.samples.len());
        let frame = self.scheduler.canvas_mut().staged();
        frame.curve.clear();
        frame.curve.extend(
            self.samples
                .iter()
                .zip(&self.time_axis[offset..])
                .map(|(value, time)| [*value, *time]),
        );
    }

    fn stage_all(&mut self) {
        {
            let frame = self.scheduler.canvas_mut().staged();
            frame.value_axis = self.value_axis.clone();
            frame.value_title = self.axis_title.clone();
            frame.time_bounds = self.time_bounds;
            frame.style = self.style;
        }
        self.publish_curve();
    }
}
