pub mod autoscale;
pub mod canvas;
pub mod events;
pub mod history;
pub mod prefix;
pub mod registry;
pub mod scale;
pub mod scheduler;
pub mod settings;
pub mod sismograph;
pub mod style;

pub use autoscale::AutoScaler;
pub use canvas::{Canvas, CanvasFrame, HeadlessCanvas, RenderBackend};
pub use events::{ListenerId, Listeners, PlotEvent};
pub use history::RollingAverage;
pub use prefix::{format_value, MetricPrefix};
pub use registry::{PlotId, PlotRegistry};
pub use scale::{scale_digits, scale_for, ScaleDiv};
pub use scheduler::{FrameScheduler, FrameStatistics, SchedulerConfig, FPS_HISTORY_DEPTH};
pub use settings::{PlotSettings, SettingsError, MAX_SAMPLE_RATE};
pub use sismograph::{PlotState, Sismograph, MAX_HISTORY_SAMPLES};
pub use style::{Color, LineStyle, TraceStyle, UnitOfMeasure};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PlotError {
    #[error("invalid configuration: {field} must be positive and finite (got {value})")]
    InvalidConfiguration { field: &'static str, value: f64 },
}

pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<f64, PlotError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        log::warn!("rejected {field} = {value}");
        Err(PlotError::InvalidConfiguration { field, value })
    }
}
