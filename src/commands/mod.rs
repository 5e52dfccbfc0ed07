//! Subcommand implementations

use clap::CommandFactory;
use eyre::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::io::{self, Read};

use crate::cli::{Cli, HookInput};

pub mod api;
pub mod config;
pub mod emit;
pub mod encode;

/// Exit code when the dispatcher reports failure
pub const EXIT_FAILURE: i32 = 1;

pub fn completions(shell: clap_complete::Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

/// Merge hook arguments from stdin, `--json` and `KEY=VALUE` pairs, in that order
pub fn collect_args(input: &HookInput) -> Result<HashMap<String, Value>> {
    let mut args = HashMap::new();

    if input.stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read arguments from stdin")?;
        args.extend(parse_object(&buffer).context("Failed to parse arguments from stdin")?);
    }

    if let Some(json) = &input.json {
        args.extend(parse_object(json).context("Failed to parse --json arguments")?);
    }

    for pair in &input.pairs {
        let (key, value) = parse_pair(pair)?;
        args.insert(key, Value::String(value));
    }

    Ok(args)
}

fn parse_object(text: &str) -> Result<HashMap<String, Value>> {
    if text.trim().is_empty() {
        return Ok(HashMap::new());
    }

    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map.into_iter().collect()),
        other => eyre::bail!("Expected a JSON object of arguments, got: {}", other),
    }
}

fn parse_pair(pair: &str) -> Result<(String, String)> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
        _ => eyre::bail!("Invalid argument '{}', expected KEY=VALUE", pair),
    }
}
