use eyre::Result;

use super::collect_args;
use crate::cli::HookInput;
use crate::config::Config;
use crate::hook::{SystemClock, encode_args};

/// Print the envelope that `emit` would send
pub fn run(input: &HookInput, config: &Config) -> Result<()> {
    let args = collect_args(input)?;
    let envelope = encode_args(&args, &config.defaults, &SystemClock)?;

    println!("{}", envelope.encode());
    Ok(())
}
