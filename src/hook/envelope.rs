//! Event envelope and its wire encoding
//!
//! The wire shape and key order are fixed:
//!
//! ```text
//! {"type":..,"provider":..,"commandId":..,"context":{"user":..,"message":..,"source":"streamerbot","timestamp":..}}
//! ```

use chrono::{DateTime, SecondsFormat, Utc};

use super::args::EventFields;

/// Origin identifier carried in every envelope
pub const SOURCE: &str = "streamerbot";

/// A single outgoing event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventEnvelope {
    pub event_type: String,
    pub provider: String,
    pub command_id: String,
    pub context: EventContext,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventContext {
    pub user: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl EventEnvelope {
    pub fn new(fields: EventFields, timestamp: DateTime<Utc>) -> Self {
        Self {
            event_type: fields.event_type,
            provider: fields.provider,
            command_id: fields.command_id,
            context: EventContext {
                user: fields.user,
                message: fields.message,
                timestamp,
            },
        }
    }

    /// Encode as single-line JSON
    pub fn encode(&self) -> String {
        let mut json = String::with_capacity(160 + self.context.message.len());
        json.push('{');
        push_field(&mut json, "type", &self.event_type);
        json.push(',');
        push_field(&mut json, "provider", &self.provider);
        json.push(',');
        push_field(&mut json, "commandId", &self.command_id);
        json.push_str(",\"context\":{");
        push_field(&mut json, "user", &self.context.user);
        json.push(',');
        push_field(&mut json, "message", &self.context.message);
        json.push(',');
        push_field(&mut json, "source", SOURCE);
        json.push(',');
        push_field(&mut json, "timestamp", &format_timestamp(&self.context.timestamp));
        json.push_str("}}");
        json
    }

    /// Routing summary for log lines
    pub fn summary(&self) -> String {
        format!(
            "eventType={} provider={} commandId={}",
            self.event_type, self.provider, self.command_id
        )
    }
}

/// ISO-8601 UTC with microseconds and a `Z` suffix
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Escape backslash, quote, LF and CR. Nothing else is touched.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

fn push_field(json: &mut String, key: &str, value: &str) {
    json.push('"');
    json.push_str(key);
    json.push_str("\":\"");
    json.push_str(&escape(value));
    json.push('"');
}
