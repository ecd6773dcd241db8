use egui::{Color32, RichText};
use egui_plot::{Line, Plot, PlotBounds, PlotPoints};
use sismo_core::{Canvas, CanvasFrame, Color, LineStyle, PlotId, RenderBackend};

/// Canvas drawn by egui.
///
/// egui redraws the whole window every frame, so a "repaint" here commits the
/// staged frame; egui keeps drawing the committed one until the next commit.
pub struct EguiCanvas {
    backend: RenderBackend,
    staged: CanvasFrame,
    presented: CanvasFrame,
    ctx: Option<egui::Context>,
}

impl EguiCanvas {
    pub fn new(backend: RenderBackend) -> Self {
        Self {
            backend,
            staged: CanvasFrame::default(),
            presented: CanvasFrame::default(),
            ctx: None,
        }
    }

    /// Lets commits wake the egui event loop.
    pub fn attach(&mut self, ctx: egui::Context) {
        self.ctx = Some(ctx);
    }

    pub fn presented(&self) -> &CanvasFrame {
        &self.presented
    }

    pub fn show(&self, ui: &mut egui::Ui, id: PlotId) {
        let frame = &self.presented;

        if let Some(overlay) = &frame.overlay {
            ui.label(RichText::new(overlay).strong().color(Color32::RED));
        }

        let plot = Plot::new(format!("sismograph_{}", id.0))
            .allow_scroll(false)
            .allow_zoom(false)
            .allow_boxed_zoom(false)
            .allow_drag(false)
            .show_grid(true)
            .x_axis_label(frame.value_title.clone())
            .y_axis_label(frame.time_title.clone());

        plot.show(ui, |plot_ui| {
            if frame.style.line_style != LineStyle::NoPen && !frame.curve.is_empty() {
                let points: PlotPoints = frame.curve.iter().copied().collect();
                let mut line = Line::new(points)
                    .color(color32(frame.style.color))
                    .width(frame.style.width as f32);
                if let Some(style) = plot_line_style(frame.style.line_style) {
                    line = line.style(style);
                }
                plot_ui.line(line);
            }

            let (time_max, time_min) = frame.time_bounds;
            let (low, high) = if time_max > time_min {
                (time_min, time_max)
            } else {
                (time_min, time_min + 1.0)
            };
            plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                [frame.value_axis.lower, low],
                [frame.value_axis.upper, high],
            ));
        });
    }
}

impl Canvas for EguiCanvas {
    fn backend(&self) -> RenderBackend {
        self.backend
    }

    fn staged(&mut self) -> &mut CanvasFrame {
        &mut self.staged
    }

    fn repaint_now(&mut self) {
        self.presented.clone_from(&self.staged);
        if let Some(ctx) = &self.ctx {
            ctx.request_repaint();
        }
    }
}

pub fn color32(color: Color) -> Color32 {
    Color32::from_rgb(color.r, color.g, color.b)
}

fn plot_line_style(style: LineStyle) -> Option<egui_plot::LineStyle> {
    match style {
        LineStyle::Solid | LineStyle::NoPen => None,
        LineStyle::Dash => Some(egui_plot::LineStyle::Dashed { length: 10.0 }),
        LineStyle::Dot => Some(egui_plot::LineStyle::Dotted { spacing: 5.0 }),
        LineStyle::DashDot | LineStyle::DashDotDot => {
            Some(egui_plot::LineStyle::Dashed { length: 6.0 })
        }
    }
}
