//! teleprompter CLI
//!
//! Opens the teleprompter window, optionally with a text file loaded.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use teleprompter::controller::Controller;
use teleprompter::error::AppError;
use teleprompter::logging::init_logging;
use teleprompter::settings::default_settings_path;
use teleprompter::tui::{self, Startup};

#[derive(Parser)]
#[command(name = "teleprompter")]
#[command(about = "Auto-scrolling teleprompter for the terminal")]
#[command(version)]
struct Cli {
    /// Text file to open
    file: Option<PathBuf>,

    /// Settings file that is loaded at startup and written on every change
    #[arg(long, value_name = "PATH", default_value_os_t = default_settings_path())]
    settings: PathBuf,

    /// Load display settings from this file instead of the settings file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs to exactly this file
    /// (default: daily teleprompter.log.YYYY-MM-DD in the per-user data directory)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let (log, _guard) = init_logging(cli.log_file.as_deref())?;
    info!(
        log = %log.path().display(),
        rotation = ?log.rotation,
        settings = %cli.settings.display(),
        "Starting teleprompter"
    );

    let controller = Controller::new(cli.settings);
    let startup = Startup {
        config: cli.config,
        text: cli.file,
    };
    tui::run(controller, startup)
}
