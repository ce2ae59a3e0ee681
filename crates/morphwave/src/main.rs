use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use morphwave_config::Config;
use morphwave_core::{AnimationSpeed, ColorTheme};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod refresh;

use app::App;

#[derive(Debug, Parser)]
#[command(
    name = "morphwave",
    version,
    about = "Animated procedural gradient waves for your terminal"
)]
struct Cli {
    /// Color theme (ocean, sunset, forest, cosmic)
    #[arg(short, long)]
    theme: Option<ColorTheme>,

    /// Animation speed (slow, normal, fast)
    #[arg(short, long)]
    speed: Option<AnimationSpeed>,

    /// Fraction of the terminal resolution to compute the field at
    #[arg(long)]
    scale: Option<f32>,

    /// Target frames per second
    #[arg(long)]
    fps: Option<u32>,

    /// How often the terminal is offered a repaint, in Hz
    #[arg(long)]
    refresh_hz: Option<u32>,

    /// Config file to use instead of the platform default
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Start with the info overlay hidden
    #[arg(long)]
    no_overlay: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Layer command line overrides on top of the file config.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if let Some(scale) = self.scale {
            config.scale = scale;
        }
        if let Some(fps) = self.fps {
            config.target_fps = fps;
        }
        if let Some(hz) = self.refresh_hz {
            config.refresh_hz = hz;
        }
        if self.no_overlay {
            config.show_overlay = false;
        }
        config.normalized()
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref(), cli.verbose)?;

    let config_path = cli.config.clone().or_else(Config::default_path);
    let stored = match &config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::default(),
    };
    let launched = cli.apply(stored.clone());

    let terminal = ratatui::init();
    let result = App::new(launched.clone()).run(terminal);
    ratatui::restore();
    let finished = result?;

    if let Some(path) = config_path {
        let updated = keep_interactive_changes(stored.clone(), &launched, &finished);
        if updated != stored {
            updated
                .save_to(&path)
                .wrap_err_with(|| format!("saving settings to {}", path.display()))?;
            info!(path = %path.display(), "settings saved");
        }
    }
    Ok(())
}

/// Carry over settings the user changed while running, leaving one-off
/// command line overrides out of the saved file.
fn keep_interactive_changes(mut stored: Config, launched: &Config, finished: &Config) -> Config {
    if finished.theme != launched.theme {
        stored.theme = finished.theme;
    }
    if finished.speed != launched.speed {
        stored.speed = finished.speed;
    }
    if finished.show_overlay != launched.show_overlay {
        stored.show_overlay = finished.show_overlay;
    }
    stored
}

/// Send tracing output to `log_file`. Without one, logging stays off since
/// the terminal belongs to the UI.
fn init_logging(log_file: Option<&Path>, verbose: bool) -> color_eyre::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .wrap_err_with(|| format!("creating log file {}", path.display()))?;
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
