use clap::{Parser, Subcommand};
use sismo_core::PlotSettings;
use sismo_gui::{run_gui, GuiConfig, SineWave};
use std::path::PathBuf;
use std::time::Duration;

mod headless;

const OPENGL_ENV: &str = "SISMO_USE_OPENGL";

#[derive(Parser)]
#[command(name = "sismo", version, about = "Rolling scope plot for live instrument samples")]
struct Cli {
    /// JSON settings file; flags below override its values
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
    /// Use the hardware-accelerated backend (also enabled by SISMO_USE_OPENGL=1)
    #[arg(long, global = true)]
    opengl: bool,
    #[arg(long, global = true)]
    refresh_hz: Option<f64>,
    #[arg(long, global = true)]
    sample_rate: Option<f64>,
    #[arg(long, global = true)]
    history_seconds: Option<f64>,
    /// Show the performance overlay and log frame statistics
    #[arg(long, global = true)]
    statistics: bool,
    /// Repaint on every sample instead of pacing frames
    #[arg(long, global = true)]
    immediate: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the plot window (default)
    Gui,
    /// Acquire without a window and print frame statistics
    Headless {
        #[arg(long, default_value_t = 1000)]
        duration_ms: u64,
        #[arg(long, default_value_t = 1.0)]
        amplitude: f64,
        #[arg(long, default_value_t = 1.0)]
        frequency_hz: f64,
    },
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Write the effective settings to a file
    Init { path: PathBuf },
    /// Print the effective settings as JSON
    Show,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let settings = effective_settings(&cli)?;

    match cli.command {
        None | Some(Commands::Gui) => {
            run_gui(GuiConfig::default(), settings)?;
        }
        Some(Commands::Headless {
            duration_ms,
            amplitude,
            frequency_hz,
        }) => {
            let wave = SineWave {
                amplitude,
                frequency_hz,
                offset: 0.0,
            };
            let report =
                headless::run_headless(&settings, wave, Duration::from_millis(duration_ms))?;
            println!("samples: {}", report.samples);
            println!("repaints: {}", report.repaints);
            println!(
                "instrument: {:.1} fps / {:.2} ms",
                report.statistics.instrument_fps, report.statistics.instrument_cycle_ms
            );
            println!(
                "plot: {:.1} fps / {:.3} ms",
                report.statistics.theoretical_fps, report.statistics.repaint_ms
            );
            println!("scale: ±{} {}", report.scale, report.axis_title);
            if let Some(readout) = report.readout {
                println!("last: {readout}");
            }
        }
        Some(Commands::Settings { command }) => match command {
            SettingsCommands::Init { path } => {
                settings.save_to_file(&path)?;
                println!("Settings written to {}", path.display());
            }
            SettingsCommands::Show => {
                println!("{}", serde_json::to_string_pretty(&settings)?);
            }
        },
    }
    Ok(())
}

/// File values first, then flags. The backend flag is resolved here, once.
fn effective_settings(cli: &Cli) -> Result<PlotSettings, sismo_core::SettingsError> {
    let mut settings = match &cli.settings {
        Some(path) => PlotSettings::load_from_file(path)?,
        None => PlotSettings::default(),
    };
    if cli.opengl || env_flag(OPENGL_ENV) {
        settings.hardware_acceleration = true;
    }
    if let Some(hz) = cli.refresh_hz {
        settings.refresh_hz = hz;
    }
    if let Some(rate) = cli.sample_rate {
        settings.sample_rate = rate;
    }
    if let Some(seconds) = cli.history_seconds {
        settings.history_seconds = seconds;
    }
    if cli.statistics {
        settings.show_statistics = true;
    }
    if cli.immediate {
        settings.coalesce_repaints = false;
    }
    settings.normalize()
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|value| {
            let value = value.trim();
            value == "1" || value.eq_ignore_ascii_case("true")
        })
        .unwrap_or(false)
}
