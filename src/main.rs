use clap::Parser;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

mod api;
mod broadcast;
mod cli;
mod commands;
mod config;
mod hook;

use cli::{Cli, Commands};
use config::{Config, LogLevel};

fn setup_logging(log_level: LogLevel, verbose: bool) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sc-hook")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("sc-hook.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG env var takes precedence, then --verbose, then config log_level
    let mut builder = env_logger::Builder::new();
    let source = if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
        "RUST_LOG env"
    } else if verbose {
        builder.filter_level(log::LevelFilter::Debug);
        "--verbose"
    } else {
        builder.filter_level(log_level.as_filter());
        "config"
    };

    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    info!("Log level from {}", source);
    Ok(())
}

fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Emit {
            input,
            sink,
            request_id,
        } => commands::emit::run(&input, &sink, request_id, cli.quiet, &config),
        Commands::Encode { input } => commands::encode::run(&input, &config),
        Commands::Info => commands::api::info(&config),
        Commands::List => commands::api::list(&config),
        Commands::Config { action } => commands::config::run(action, &config),
        Commands::Completions { shell } => commands::completions(shell),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration before logging, so log messages in Config::load are silent
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(config.log_level, cli.verbose).context("Failed to setup logging")?;

    info!("Starting sc-hook with config from: {:?}", cli.config);

    run(cli, config).context("Command failed")?;

    Ok(())
}
