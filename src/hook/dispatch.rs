//! Hook event dispatching

use eyre::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;

use super::{Broadcaster, Clock, EventEnvelope, HookArgs, HookDefaults, LOG_PREFIX, LogSink, SystemClock};

/// Resolve host arguments against the defaults and stamp the envelope with `clock`
pub fn encode_args(args: &HashMap<String, Value>, defaults: &HookDefaults, clock: &dyn Clock) -> Result<EventEnvelope> {
    let hook_args = HookArgs::from_map(args).context("Failed to resolve hook arguments")?;
    Ok(EventEnvelope::new(hook_args.resolve(defaults), clock.now()))
}

/// Encodes host arguments into an envelope and broadcasts it.
///
/// Holds no per-call state; every call builds its envelope from its own
/// arguments.
pub struct Dispatcher {
    broadcaster: Box<dyn Broadcaster>,
    log: Box<dyn LogSink>,
    clock: Box<dyn Clock>,
    defaults: HookDefaults,
    request_id: Option<String>,
}

impl Dispatcher {
    pub fn new(broadcaster: Box<dyn Broadcaster>, log: Box<dyn LogSink>) -> Self {
        Self {
            broadcaster,
            log,
            clock: Box::new(SystemClock),
            defaults: HookDefaults::default(),
            request_id: None,
        }
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_defaults(mut self, defaults: HookDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Correlation id appended to host log lines
    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    /// Resolve and encode without sending
    pub fn encode(&self, args: &HashMap<String, Value>) -> Result<EventEnvelope> {
        encode_args(args, &self.defaults, self.clock.as_ref())
    }

    /// Encode and broadcast, logging one info line on success
    pub fn dispatch(&self, args: &HashMap<String, Value>) -> Result<EventEnvelope> {
        let envelope = self.encode(args)?;
        let json = envelope.encode();

        log::debug!("Broadcasting via {}: {}", self.broadcaster.name(), json);
        self.broadcaster
            .send(&json)
            .with_context(|| format!("Broadcast via {} failed", self.broadcaster.name()))?;

        self.log.log(
            log::Level::Info,
            &format!("{} WS broadcast sent → {}{}", LOG_PREFIX, envelope.summary(), self.request_suffix()),
        );
        Ok(envelope)
    }

    /// Run a dispatch and reduce it to success or failure.
    ///
    /// Failures are logged once at error level with the full cause chain and
    /// never returned to the caller.
    pub fn execute(&self, args: &HashMap<String, Value>) -> bool {
        match self.dispatch(args) {
            Ok(_) => true,
            Err(e) => {
                self.log.log(
                    log::Level::Error,
                    &format!("{} WS broadcast ERROR{}: {:#}", LOG_PREFIX, self.request_suffix(), e),
                );
                false
            }
        }
    }

    fn request_suffix(&self) -> String {
        match &self.request_id {
            Some(id) => format!(" request_id={}", id),
            None => String::new(),
        }
    }
}
