use clap::ValueEnum;
use colored::*;
use eyre::{Context, Result};

use crate::cli::ConfigAction;
use crate::config::{BroadcastSink, Config};

pub fn run(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show => show(config),
        ConfigAction::Get { key } => get(&key, config),
    }
}

fn show(config: &Config) -> Result<()> {
    let yaml = serde_yaml::to_string(config).context("Failed to serialize config")?;
    print!("{}", yaml);
    Ok(())
}

fn get(key: &str, config: &Config) -> Result<()> {
    match lookup(key, config) {
        Some(v) => {
            println!("{}", v);
            Ok(())
        }
        None => {
            eprintln!("{} Unknown config key: {}", "✗".red(), key);
            std::process::exit(1);
        }
    }
}

fn lookup(key: &str, config: &Config) -> Option<String> {
    let defaults = &config.defaults;
    let broadcast = &config.broadcast;

    match key {
        "log_level" | "log-level" => Some(config.log_level.as_str().to_string()),
        "defaults.provider" => Some(defaults.provider.clone()),
        "defaults.command_id" => Some(defaults.command_id.clone()),
        "defaults.event_type" => Some(defaults.event_type.clone()),
        "defaults.user" => Some(defaults.user.clone()),
        "defaults.raw_input" => Some(defaults.raw_input.clone()),
        "broadcast.sinks" => Some(sink_names(&broadcast.sinks)),
        "broadcast.http_endpoint" => Some(broadcast.http_endpoint.clone()),
        "broadcast.timeout_secs" => Some(broadcast.timeout_secs.to_string()),
        "broadcast.file_dir" => Some(Config::expand_path(&broadcast.file_dir).display().to_string()),
        _ => None,
    }
}

/// Comma-separated sink names as accepted by `--sink`
fn sink_names(sinks: &[BroadcastSink]) -> String {
    sinks
        .iter()
        .filter_map(|s| s.to_possible_value())
        .map(|v| v.get_name().to_string())
        .collect::<Vec<_>>()
        .join(",")
}
