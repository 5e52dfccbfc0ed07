use colored::*;
use eyre::{Context, Result};
use uuid::Uuid;

use super::{EXIT_FAILURE, collect_args};
use crate::broadcast::{self, LogCrateSink};
use crate::cli::HookInput;
use crate::config::{BroadcastSink, Config};
use crate::hook::Dispatcher;

pub fn run(
    input: &HookInput,
    sink_override: &[BroadcastSink],
    request_id: Option<Option<String>>,
    quiet: bool,
    config: &Config,
) -> Result<()> {
    let args = collect_args(input)?;
    let request_id = resolve_request_id(request_id);

    let sinks = if sink_override.is_empty() {
        config.broadcast.sinks.as_slice()
    } else {
        sink_override
    };
    let broadcaster = broadcast::build(sinks, &config.broadcast, request_id.as_deref())
        .context("Failed to set up broadcast sinks")?;
    let via = broadcaster.name().to_string();

    let dispatcher = Dispatcher::new(broadcaster, Box::new(LogCrateSink))
        .with_defaults(config.defaults.clone())
        .with_request_id(request_id);

    log::info!("Emitting hook event with {} argument(s) via {}", args.len(), via);
    let ok = dispatcher.execute(&args);

    if !quiet {
        if ok {
            eprintln!("{} Event broadcast via {}", "✓".green(), via.cyan());
        } else {
            eprintln!("{} Broadcast via {} failed, see log for details", "✗".red(), via.cyan());
        }
    }

    if !ok {
        std::process::exit(EXIT_FAILURE);
    }

    Ok(())
}

/// `--request-id` alone generates a fresh id; an explicit value is used as is
fn resolve_request_id(flag: Option<Option<String>>) -> Option<String> {
    flag.map(|id| id.unwrap_or_else(|| Uuid::new_v4().simple().to_string()))
}
