use crate::scale::ScaleDiv;
use crate::style::TraceStyle;
use serde::{Deserialize, Serialize};

/// Rendering backend, fixed for the lifetime of a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderBackend {
    HardwareAccelerated,
    #[default]
    Software,
}

impl RenderBackend {
    pub fn from_flag(hardware_acceleration: bool) -> Self {
        if hardware_acceleration {
            Self::HardwareAccelerated
        } else {
            Self::Software
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::HardwareAccelerated => "Hardware-accelerated rendering",
            Self::Software => "Software rendering",
        }
    }
}

/// Everything a canvas needs to draw one frame of a rolling plot.
///
/// Curve points are `[value, time_offset]`: the value runs along the
/// horizontal axis and the time offset (seconds before now) along the
/// vertical one.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasFrame {
    pub curve: Vec<[f64; 2]>,
    pub value_axis: ScaleDiv,
    pub value_title: String,
    pub time_bounds: (f64, f64),
    pub time_title: String,
    pub style: TraceStyle,
    pub overlay: Option<String>,
}

impl Default for CanvasFrame {
    fn default() -> Self {
        Self {
            curve: Vec::new(),
            value_axis: ScaleDiv::divide(-0.1, 0.1, 5, 5),
            value_title: "Voltage(V)".to_string(),
            time_bounds: (0.0, 0.0),
            time_title: "Time (s)".to_string(),
            style: TraceStyle::default(),
            overlay: None,
        }
    }
}

/// Drawing surface driven by the frame scheduler.
///
/// Producers write into the staged frame at any time; only `repaint_now`
/// makes it visible.
pub trait Canvas {
    fn backend(&self) -> RenderBackend;

    fn staged(&mut self) -> &mut CanvasFrame;

    /// Synchronously draws the staged frame.
    fn repaint_now(&mut self);
}

/// Canvas without a window. Keeps the last presented frame and counts
/// repaints.
#[derive(Debug, Clone, Default)]
pub struct HeadlessCanvas {
    backend: RenderBackend,
    staged: CanvasFrame,
    presented: CanvasFrame,
    repaints: u64,
}

impl HeadlessCanvas {
    pub fn new(backend: RenderBackend) -> Self {
        Self {
            backend,
            ..Default::default()
        }
    }

    pub fn presented(&self) -> &CanvasFrame {
        &self.presented
    }

    pub fn repaints(&self) -> u64 {
        self.repaints
    }
}

impl Canvas for HeadlessCanvas {
    fn backend(&self) -> RenderBackend {
        self.backend
    }

    fn staged(&mut self) -> &mut CanvasFrame {
        &mut self.staged
    }

    fn repaint_now(&mut self) {
        self.presented.clone_from(&self.staged);
        self.repaints += 1;
        log::trace!(
            "headless repaint #{} ({} points)",
            self.repaints,
            self.presented.curve.len()
        );
    }
}
