use crate::canvas::{color32, EguiCanvas};
use crate::source::SineSource;
use eframe::egui;
use sismo_core::{Color, LineStyle, PlotSettings, Sismograph};
use std::time::Duration;

const LINE_STYLES: [LineStyle; 6] = [
    LineStyle::Solid,
    LineStyle::Dash,
    LineStyle::Dot,
    LineStyle::DashDot,
    LineStyle::DashDotDot,
    LineStyle::NoPen,
];

pub(crate) struct SismoApp {
    plot: Sismograph<EguiCanvas>,
    source: SineSource,
    draft: PlotSettings,
    running: bool,
    status: Option<String>,
}

impl SismoApp {
    pub(crate) fn new(plot: Sismograph<EguiCanvas>, source: SineSource, settings: PlotSettings) -> Self {
        Self {
            plot,
            source,
            draft: settings,
            running: false,
            status: None,
        }
    }

    fn set_running(&mut self, running: bool) {
        self.running = running;
        if running {
            self.plot.start();
        } else {
            self.plot.stop();
        }
        log::info!(
            "{} {}",
            self.plot.id(),
            if running { "started" } else { "stopped" }
        );
    }

    fn render_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Acquisition");
        let label = if self.running { "Stop" } else { "Start" };
        if ui.button(label).clicked() {
            self.set_running(!self.running);
        }
        if ui.button("Reset").clicked() {
            self.plot.reset();
        }

        ui.separator();
        ui.label("Refresh rate (Hz)");
        let refresh = ui.add(
            egui::DragValue::new(&mut self.draft.refresh_hz)
                .clamp_range(1.0..=240.0)
                .speed(1.0),
        );
        if refresh.changed() {
            let result = self.plot.scheduler_mut().set_refresh_rate(self.draft.refresh_hz);
            self.report(result);
        }

        ui.label("Sample rate (Hz)");
        let rate = ui.add(
            egui::DragValue::new(&mut self.draft.sample_rate)
                .clamp_range(0.1..=10_000.0)
                .speed(1.0),
        );
        if rate.changed() {
            let result = self.plot.set_sample_rate(self.draft.sample_rate);
            if result.is_ok() {
                self.source.set_sample_rate(self.draft.sample_rate);
            }
            self.report(result);
        }

        ui.label("History (s)");
        let history = ui.add(
            egui::DragValue::new(&mut self.draft.history_seconds)
                .clamp_range(0.1..=600.0)
                .speed(0.1),
        );
        if history.changed() {
            let result = self.plot.set_history_duration(self.draft.history_seconds);
            self.report(result);
        }

        ui.label("Precision");
        if ui
            .add(egui::Slider::new(&mut self.draft.precision, 0..=9))
            .changed()
        {
            self.plot.set_precision(self.draft.precision);
        }

        ui.separator();
        ui.heading("Trace");
        let mut rgb = [self.draft.color.r, self.draft.color.g, self.draft.color.b];
        if ui.color_edit_button_srgb(&mut rgb).changed() {
            self.draft.color = Color::rgb(rgb[0], rgb[1], rgb[2]);
            self.plot.set_color(self.draft.color);
        }
        if ui
            .add(egui::Slider::new(&mut self.draft.line_width, 0.5..=5.0).text("width"))
            .changed()
        {
            self.plot.set_line_width(self.draft.line_width);
        }
        egui::ComboBox::from_label("style")
            .selected_text(format!("{:?}", self.draft.line_style))
            .show_ui(ui, |ui| {
                for style in LINE_STYLES {
                    if ui
                        .selectable_value(&mut self.draft.line_style, style, format!("{style:?}"))
                        .changed()
                    {
                        self.plot.set_line_style(style);
                    }
                }
            });

        ui.separator();
        if ui
            .checkbox(&mut self.draft.show_statistics, "Show statistics")
            .changed()
        {
            self.plot
                .scheduler_mut()
                .set_statistics_visible(self.draft.show_statistics);
        }

        if let Some(status) = &self.status {
            ui.colored_label(egui::Color32::YELLOW, status);
        }
    }

    fn report<E: std::fmt::Display>(&mut self, result: Result<(), E>) {
        self.status = result.err().map(|err| err.to_string());
    }
}

impl eframe::App for SismoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let samples = self.source.drain();
        if self.running {
            for sample in samples {
                self.plot.push_sample(sample);
            }
        }
        self.plot.tick();

        egui::SidePanel::left("sismo_controls")
            .resizable(false)
            .show(ctx, |ui| self.render_controls(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            let readout = self.plot.readout().unwrap_or_else(|| "--".to_string());
            ui.label(
                egui::RichText::new(readout)
                    .size(22.0)
                    .color(color32(self.plot.style().color)),
            );
            self.plot.canvas().show(ui, self.plot.id());
        });

        let idle = self.source.period();
        let wait = self
            .plot
            .scheduler()
            .time_until_next_frame()
            .map_or(idle, |due| due.min(idle))
            .max(Duration::from_millis(1));
        ctx.request_repaint_after(wait);
    }
}

impl Drop for SismoApp {
    fn drop(&mut self) {
        if self.running {
            self.plot.stop();
        }
    }
}
