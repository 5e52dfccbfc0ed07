use eyre::{Context, Result};
use serde_json::Value;

use crate::api::ExternalApi;
use crate::config::Config;

pub fn info(config: &Config) -> Result<()> {
    let info = client(config)?.info().context("Failed to fetch external API info")?;
    print_json(&info)
}

pub fn list(config: &Config) -> Result<()> {
    let hooks = client(config)?.list().context("Failed to list external hooks")?;
    print_json(&hooks)
}

fn client(config: &Config) -> Result<ExternalApi> {
    ExternalApi::from_endpoint(&config.broadcast.http_endpoint, config.broadcast.timeout())
        .context("Failed to derive API address from broadcast.http_endpoint")
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("Failed to format response")?);
    Ok(())
}
