use crate::canvas::RenderBackend;
use crate::scheduler::{SchedulerConfig, DEFAULT_REFRESH_HZ};
use crate::sismograph::MAX_HISTORY_SAMPLES;
use crate::style::{Color, LineStyle, TraceStyle, UnitOfMeasure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const MAX_PRECISION: usize = 9;
pub const MAX_SAMPLE_RATE: f64 = 1_000_000.0;

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// User-facing configuration of one rolling plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSettings {
    pub refresh_hz: f64,
    pub coalesce_repaints: bool,
    pub hardware_acceleration: bool,
    pub show_statistics: bool,
    pub sample_rate: f64,
    pub history_seconds: f64,
    pub precision: usize,
    pub unit: UnitOfMeasure,
    pub color: Color,
    pub line_width: f64,
    pub line_style: LineStyle,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            refresh_hz: DEFAULT_REFRESH_HZ,
            coalesce_repaints: true,
            hardware_acceleration: false,
            show_statistics: false,
            sample_rate: 10.0,
            history_seconds: 10.0,
            precision: 3,
            unit: UnitOfMeasure::default(),
            color: Color::default(),
            line_width: 1.0,
            line_style: LineStyle::Solid,
        }
    }
}

impl PlotSettings {
    pub fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let data = fs::read(path)?;
        let settings: PlotSettings = serde_json::from_slice(&data)?;
        settings.normalize()
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_vec_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Rejects rates and durations that cannot drive a plot; clamps the
    /// cosmetic fields.
    pub fn normalize(mut self) -> Result<Self, SettingsError> {
        positive("refresh_hz", self.refresh_hz)?;
        positive("sample_rate", self.sample_rate)?;
        positive("history_seconds", self.history_seconds)?;
        if self.sample_rate > MAX_SAMPLE_RATE {
            return Err(SettingsError::Invalid(format!(
                "sample_rate must not exceed {MAX_SAMPLE_RATE} Hz (got {})",
                self.sample_rate
            )));
        }
        let window = (self.history_seconds * self.sample_rate).round();
        if window > MAX_HISTORY_SAMPLES as f64 {
            return Err(SettingsError::Invalid(format!(
                "history_seconds spans {window} samples, at most {MAX_HISTORY_SAMPLES} allowed"
            )));
        }
        self.precision = self.precision.min(MAX_PRECISION);
        if !(self.line_width.is_finite() && self.line_width > 0.0) {
            self.line_width = 1.0;
        }
        Ok(self)
    }

    pub fn render_backend(&self) -> RenderBackend {
        RenderBackend::from_flag(self.hardware_acceleration)
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            refresh_hz: self.refresh_hz,
            coalesce: self.coalesce_repaints,
            show_statistics: self.show_statistics,
        }
    }

    pub fn trace_style(&self) -> TraceStyle {
        TraceStyle {
            color: self.color,
            width: self.line_width,
            line_style: self.line_style,
        }
    }
}

fn positive(field: &str, value: f64) -> Result<(), SettingsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::Invalid(format!(
            "{field} must be positive (got {value})"
        )))
    }
}
