//! Host argument resolution
//!
//! Hosts pass loosely typed arguments. Each recognized key is pulled out
//! independently and falls back to its own default when absent.

use eyre::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

pub const ARG_PROVIDER: &str = "provider";
pub const ARG_COMMAND_ID: &str = "commandId";
pub const ARG_EVENT_TYPE: &str = "eventType";
pub const ARG_USER: &str = "user";
pub const ARG_RAW_INPUT: &str = "rawInput";

const RECOGNIZED: [&str; 5] = [ARG_PROVIDER, ARG_COMMAND_ID, ARG_EVENT_TYPE, ARG_USER, ARG_RAW_INPUT];

/// Fallback values for absent arguments
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HookDefaults {
    /// Routing namespace
    pub provider: String,
    /// Automation chain selector
    pub command_id: String,
    /// Parser selection category
    pub event_type: String,
    pub user: String,
    pub raw_input: String,
}

impl Default for HookDefaults {
    fn default() -> Self {
        Self {
            provider: "streamconnector".to_string(),
            command_id: "test".to_string(),
            event_type: "external_hook".to_string(),
            user: "unknown".to_string(),
            raw_input: String::new(),
        }
    }
}

/// Arguments as supplied by the host, before defaults are applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookArgs {
    pub provider: Option<String>,
    pub command_id: Option<String>,
    pub event_type: Option<String>,
    pub user: Option<String>,
    pub raw_input: Option<String>,
}

/// Arguments with every field filled in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFields {
    pub provider: String,
    pub command_id: String,
    pub event_type: String,
    pub user: String,
    pub message: String,
}

impl HookArgs {
    /// Extract recognized keys from a host argument map
    pub fn from_map(args: &HashMap<String, Value>) -> Result<Self> {
        for key in args.keys().filter(|k| !RECOGNIZED.contains(&k.as_str())) {
            log::debug!("Ignoring unrecognized argument: {}", key);
        }

        Ok(Self {
            provider: scalar_arg(args, ARG_PROVIDER)?,
            command_id: scalar_arg(args, ARG_COMMAND_ID)?,
            event_type: scalar_arg(args, ARG_EVENT_TYPE)?,
            user: scalar_arg(args, ARG_USER)?,
            raw_input: scalar_arg(args, ARG_RAW_INPUT)?,
        })
    }

    /// Fill absent fields from the defaults
    pub fn resolve(self, defaults: &HookDefaults) -> EventFields {
        EventFields {
            provider: self.provider.unwrap_or_else(|| defaults.provider.clone()),
            command_id: self.command_id.unwrap_or_else(|| defaults.command_id.clone()),
            event_type: self.event_type.unwrap_or_else(|| defaults.event_type.clone()),
            user: self.user.unwrap_or_else(|| defaults.user.clone()),
            message: self.raw_input.unwrap_or_else(|| defaults.raw_input.clone()),
        }
    }
}

/// Coerce a scalar argument to text. Null reads as the empty string.
fn scalar_arg(args: &HashMap<String, Value>, key: &str) -> Result<Option<String>> {
    match args.get(key) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(String::new())),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Array(_)) => eyre::bail!("Argument '{}' must be a scalar, got an array", key),
        Some(Value::Object(_)) => eyre::bail!("Argument '{}' must be a scalar, got an object", key),
    }
}
