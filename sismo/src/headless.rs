use sismo_core::{
    FrameStatistics, HeadlessCanvas, PlotError, PlotRegistry, PlotSettings, Sismograph,
};
use sismo_gui::SineWave;
use std::thread;
use std::time::Duration;
use timing::{Clock, SystemClock};

/// Summary of a windowless acquisition session.
#[derive(Debug, Clone)]
pub struct HeadlessReport {
    pub samples: u64,
    pub repaints: u64,
    pub statistics: FrameStatistics,
    pub scale: f64,
    pub axis_title: String,
    pub readout: Option<String>,
}

/// Feeds a sine wave into a plot drawn on a [`HeadlessCanvas`] for
/// `duration`, then stops the plot.
pub fn run_headless(
    settings: &PlotSettings,
    wave: SineWave,
    duration: Duration,
) -> Result<HeadlessReport, PlotError> {
    let clock = SystemClock::new();
    let mut registry = PlotRegistry::new();
    let mut plot: Sismograph<HeadlessCanvas> = registry.create_sismograph(
        HeadlessCanvas::new(settings.render_backend()),
        Box::new(clock),
        settings,
    )?;
    log::info!(
        "{} headless run for {:?} ({})",
        plot.id(),
        duration,
        settings.render_backend().label()
    );

    let period =
        Duration::from_secs_f64(1.0 / settings.sample_rate).max(Duration::from_nanos(1));
    let mut next_sample = clock.now();
    let end = next_sample + duration;
    let mut samples: u64 = 0;

    plot.start();
    loop {
        let now = clock.now();
        if now >= end {
            break;
        }
        while next_sample <= now {
            plot.push_sample(wave.value_at(samples as f64 / settings.sample_rate));
            samples += 1;
            next_sample += period;
        }
        plot.tick();

        let until_sample = next_sample.saturating_sub(clock.now());
        let wait = plot
            .scheduler()
            .time_until_next_frame()
            .map_or(until_sample, |due| due.min(until_sample))
            .min(end.saturating_sub(clock.now()));
        if !wait.is_zero() {
            thread::sleep(wait);
        }
    }
    plot.stop();

    Ok(HeadlessReport {
        samples,
        repaints: plot.canvas().repaints(),
        statistics: plot.scheduler().statistics(),
        scale: plot.current_scale(),
        axis_title: plot.axis_title().to_string(),
        readout: plot.readout(),
    })
}
