mod cli;
mod config;
mod record;
mod render;

use clap::{error::ErrorKind, CommandFactory, FromArgMatches, Parser};
use cli::Cli;
use config::{ConfigErrors, ReportConfig};
use render::ReportTableRenderer;
use std::{
    env,
    ffi::OsString,
    io::{self, Write},
    process::exit,
};
use tracing::{debug, error, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Parse the command line, keeping whatever could be read when parsing fails.
///
/// Only help and version requests are returned as errors.
fn parse_cli(args: Vec<OsString>) -> Result<Cli, clap::Error> {
    let error = match Cli::try_parse_from(&args) {
        Ok(cli) => return Ok(cli),
        Err(error) if matches!(error.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            return Err(error)
        }
        Err(error) => error,
    };

    warn!("Failed to parse all arguments, rendering with what could be read: {error}");

    // clap stops at the first error but keeps everything matched before it
    let mut cli = Cli::command()
        .ignore_errors(true)
        .try_get_matches_from(&args)
        .and_then(|matches| Cli::from_arg_matches(&matches))
        .unwrap_or_default();

    // the thread count is always the first argument when given
    if cli.threads.is_none() {
        cli.threads = args
            .get(1)
            .and_then(|arg| arg.to_str())
            .filter(|arg| !arg.starts_with('-'))
            .map(str::to_string);
    }

    Ok(cli)
}

/// build the renderer and thread count from the command line and an optional config file
fn prepare(cli: &Cli) -> Result<(ReportTableRenderer, String), ConfigErrors> {
    let mut config = match &cli.config {
        Some(path) => ReportConfig::load(path).map_err(|error| {
            error!(path = ?path, "Failed to load config: {error}");
            error
        })?,
        None => ReportConfig::default(),
    };

    cli.apply(&mut config);

    if config.preflight_checks() {
        return Err(ConfigErrors::FailedPreflight);
    }

    let catalog = config.select_packages(cli.packages.as_slice())?;
    let renderer = ReportTableRenderer::new(catalog)
        .with_root(config.root)
        .strict_line_count(config.strict_line_count);

    Ok((renderer, config.threads))
}

fn main() {
    // stdout is reserved for the tables
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = match parse_cli(env::args_os().collect()) {
        Ok(cli) => cli,
        Err(error) => error.exit(),
    };

    let (renderer, threads) = match prepare(&cli) {
        Ok(prepared) => prepared,
        Err(error) => {
            error!("Unable to render tables: {error}");
            exit(1)
        }
    };

    let mut stdout = io::stdout().lock();
    for line in renderer.render(&threads) {
        if let Err(error) = writeln!(stdout, "{line}") {
            // most likely a closed pipe, nobody is left to read the rest
            debug!("Stopped writing tables: {error}");
            return;
        }
    }

    if let Err(error) = stdout.flush() {
        debug!("Failed to flush tables: {error}");
    }
}
