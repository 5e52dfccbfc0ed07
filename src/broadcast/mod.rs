//! Broadcast sinks
//!
//! Concrete `Broadcaster` implementations:
//! - Stdout - prints the envelope as one line
//! - File (JSONL) - appends to dated files under a directory
//! - HTTP - POSTs to the Stream Connector external API
//!
//! plus a fan-out over several of them and a `LogSink` onto the `log` crate.

pub mod sinks;

use eyre::Result;

use crate::config::{BroadcastConfig, BroadcastSink, Config};
use crate::hook::{Broadcaster, LogSink};

pub use sinks::{FanoutBroadcaster, FileBroadcaster, HttpBroadcaster, StdoutBroadcaster};

/// Target used for host log lines
pub const HOST_LOG_TARGET: &str = "sc_hook::host";

/// Forwards host log lines to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogCrateSink;

impl LogSink for LogCrateSink {
    fn log(&self, level: log::Level, message: &str) {
        log::log!(target: HOST_LOG_TARGET, level, "{}", message);
    }
}

/// Build the broadcaster for a set of sinks.
///
/// `request_id` is forwarded to sinks that can carry it (HTTP).
pub fn build(
    sinks: &[BroadcastSink],
    config: &BroadcastConfig,
    request_id: Option<&str>,
) -> Result<Box<dyn Broadcaster>> {
    let mut built: Vec<Box<dyn Broadcaster>> = Vec::with_capacity(sinks.len());

    for sink in sinks {
        let broadcaster: Box<dyn Broadcaster> = match sink {
            BroadcastSink::Stdout => Box::new(StdoutBroadcaster),
            BroadcastSink::File => Box::new(FileBroadcaster::new(Config::expand_path(&config.file_dir))),
            BroadcastSink::Http => Box::new(
                HttpBroadcaster::new(&config.http_endpoint, config.timeout())
                    .with_request_id(request_id.map(str::to_string)),
            ),
        };
        built.push(broadcaster);
    }

    if built.len() == 1 {
        return Ok(built.remove(0));
    }
    Ok(Box::new(FanoutBroadcaster::new(built)?))
}
