use eframe::egui;
use sismo_core::{PlotRegistry, PlotSettings, RenderBackend};
use timing::SystemClock;

mod app;
pub mod canvas;
pub mod source;

pub use canvas::EguiCanvas;
pub use source::{SineSource, SineWave};

use app::SismoApp;

#[derive(Debug, Clone)]
pub struct GuiConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub wave: SineWave,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            title: "Sismo".to_string(),
            width: 1024.0,
            height: 640.0,
            wave: SineWave::default(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum GuiError {
    #[error("gui error: {0}")]
    Gui(String),
    #[error(transparent)]
    Plot(#[from] sismo_core::PlotError),
}

/// Opens the plot window and blocks until it is closed.
///
/// The rendering backend is taken from `settings` once and stays fixed for
/// the window's lifetime.
pub fn run_gui(config: GuiConfig, settings: PlotSettings) -> Result<(), GuiError> {
    let backend = settings.render_backend();
    let mut registry = PlotRegistry::new();
    let plot = registry.create_sismograph(
        EguiCanvas::new(backend),
        Box::new(SystemClock::new()),
        &settings,
    )?;
    log::info!("{} ready ({})", plot.id(), backend.label());

    let mut options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([config.width, config.height]),
        ..Default::default()
    };
    // NOTE: frame pacing is owned by the plot scheduler, not the compositor.
    options.vsync = false;
    options.hardware_acceleration = match backend {
        RenderBackend::HardwareAccelerated => eframe::HardwareAcceleration::Required,
        RenderBackend::Software => eframe::HardwareAcceleration::Off,
    };

    let wave = config.wave;
    eframe::run_native(
        &config.title,
        options,
        Box::new(move |cc| {
            let mut plot = plot;
            plot.scheduler_mut()
                .canvas_mut()
                .attach(cc.egui_ctx.clone());
            let source = SineSource::spawn(wave, settings.sample_rate);
            Box::new(SismoApp::new(plot, source, settings))
        }),
    )
    .map_err(|err| GuiError::Gui(err.to_string()))
}
