//! Rapat - random participant picker for meetings
//!
//! Keeps a roster of meeting participants and picks from it with an
//! animated wheel, either one winner or a full random order.

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod error;
mod platform;
mod scheduler;
mod state;
mod viewmodel;

fn main() -> ExitCode {
    // Logs go to stderr so frame output on stdout stays clean
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = cli::Cli::parse();

    let color = platform::ColorSupport::detect();
    platform::log_platform_info(color);

    let state = match state::AppState::new(cli.config.as_deref()) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize application: {}", e);
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let stdout = std::io::stdout();
    let output = commands::Output {
        color,
        animate: stdout.is_terminal(),
    };

    let mut out = stdout.lock();
    match commands::run(cli.command, &state, cli.seed, output, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_user_warning() => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
