mod args;
mod commands;
mod error;
mod render;
mod session;
mod ticker;

use std::process::ExitCode;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use osusume_core::AppConfig;

use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = args::Cli::parse();
    let guard = init_logging(&cli);

    let result = commands::run(cli).await;
    finish(result, guard)
}

/// Report the outcome, flushing the log file before the process exits.
fn finish(result: Result<(), CliError>, guard: Option<WorkerGuard>) -> ExitCode {
    if let Err(e) = &result {
        tracing::error!(error = %e, "osusume failed");
    }
    drop(guard);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// The interactive session owns the terminal, so it logs to a file.
fn init_logging(cli: &args::Cli) -> Option<WorkerGuard> {
    let default = if cli.verbose {
        "osusume=debug"
    } else {
        "osusume=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    if cli.command.is_interactive() {
        let appender = tracing_appender::rolling::daily(AppConfig::log_dir(), "osusume.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .init();
        Some(guard)
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        None
    }
}
