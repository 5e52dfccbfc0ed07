//! Hook event emission
//!
//! The dispatcher turns a bag of host arguments into an event envelope and
//! hands it to a broadcaster. It only talks to the outside world through the
//! ports defined here.

use chrono::{DateTime, Utc};
use eyre::Result;

pub mod args;
pub mod dispatch;
pub mod envelope;

#[cfg(test)]
pub mod mocks;

pub use args::{HookArgs, HookDefaults};
pub use dispatch::{Dispatcher, encode_args};
pub use envelope::EventEnvelope;

/// Prefix used on every host log line
pub const LOG_PREFIX: &str = "[StreamConnector]";

/// Port for delivering an encoded envelope.
///
/// Delivery is fire-and-forget: `Ok` means the text was handed off,
/// not that anyone received it.
pub trait Broadcaster: Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &str;

    fn send(&self, json: &str) -> Result<()>;
}

/// Port for host-visible log lines
pub trait LogSink: Send + Sync {
    fn log(&self, level: log::Level, message: &str);
}

/// Port for obtaining the encode-time instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
