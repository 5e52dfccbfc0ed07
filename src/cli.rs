use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::BroadcastSink;

#[derive(Parser)]
#[command(
    name = "sc-hook",
    about = "Emit Stream Connector external hook events",
    version,
    after_help = "Logs are written to: ~/.local/share/sc-hook/logs/sc-hook.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to sc-hook.yaml config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Log at debug level")]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, help = "Suppress status output")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encode an event and broadcast it
    Emit {
        #[command(flatten)]
        input: HookInput,

        /// Override the configured sinks (repeatable)
        #[arg(long, value_enum)]
        sink: Vec<BroadcastSink>,

        /// Correlation id for log lines and HTTP requests; generated when given without a value
        #[arg(long, value_name = "ID", num_args = 0..=1, require_equals = true)]
        request_id: Option<Option<String>>,
    },

    /// Encode an event and print it without broadcasting
    Encode {
        #[command(flatten)]
        input: HookInput,
    },

    /// Show Stream Connector external API info
    Info,

    /// List external hooks registered with Stream Connector
    List,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

/// Where hook arguments come from
#[derive(Args, Debug, Clone, Default)]
pub struct HookInput {
    /// Arguments as KEY=VALUE (provider, commandId, eventType, user, rawInput)
    #[arg(value_name = "KEY=VALUE")]
    pub pairs: Vec<String>,

    /// Arguments as a JSON object
    #[arg(long, value_name = "OBJECT")]
    pub json: Option<String>,

    /// Read a JSON object of arguments from stdin
    #[arg(long)]
    pub stdin: bool,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Print a single configuration value
    Get {
        /// Dotted key, e.g. defaults.provider
        key: String,
    },
}
