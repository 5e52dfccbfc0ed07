use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::hook::HookDefaults;

pub const CONFIG_FILE: &str = "sc-hook.yaml";

/// Main sc-hook configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub log_level: LogLevel,
    /// Values used for arguments the host leaves out
    pub defaults: HookDefaults,
    pub broadcast: BroadcastConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }

    /// Name as written in the config file
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Broadcast sink type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BroadcastSink {
    /// Print to stdout
    Stdout,
    /// Append to JSONL files
    File,
    /// POST to HTTP endpoint
    Http,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BroadcastConfig {
    /// Which sinks receive each event
    pub sinks: Vec<BroadcastSink>,
    /// Endpoint for the http sink
    pub http_endpoint: String,
    /// Request timeout for the http sink
    pub timeout_secs: u64,
    /// Root directory for the file sink
    pub file_dir: PathBuf,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            sinks: vec![BroadcastSink::Stdout],
            http_endpoint: "http://127.0.0.1:8840/api/external/exec".to_string(),
            timeout_secs: 5,
            file_dir: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("sc-hook")
                .join("events"),
        }
    }
}

impl BroadcastConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // An explicit path must load
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        if let Ok(env_path) = std::env::var("SC_HOOK_CONFIG") {
            let path = PathBuf::from(env_path);
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => log::warn!("Failed to load config from SC_HOOK_CONFIG: {}", e),
                }
            }
        }

        if let Ok(dir) = std::env::var("SC_HOOK_DIR") {
            let path = PathBuf::from(dir).join(CONFIG_FILE);
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => log::warn!("Failed to load config from SC_HOOK_DIR: {}", e),
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("sc-hook").join(CONFIG_FILE);
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => log::warn!("Failed to load config from {}: {}", path.display(), e),
                }
            }
        }

        let local_config = PathBuf::from(CONFIG_FILE);
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => log::warn!("Failed to load local config: {}", e),
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Expand a path that may contain ~ or env vars
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
        PathBuf::from(expanded.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.defaults, HookDefaults::default());
        assert_eq!(config.broadcast.sinks, vec![BroadcastSink::Stdout]);
        assert_eq!(config.broadcast.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"
log_level: debug
defaults:
  provider: twitch
  command_id: raid
broadcast:
  sinks: [file, http]
  http_endpoint: http://localhost:9000/hook
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.defaults.provider, "twitch");
        assert_eq!(config.defaults.command_id, "raid");
        // Unset defaults keep their built-in values
        assert_eq!(config.defaults.event_type, "external_hook");
        assert_eq!(config.defaults.user, "unknown");
        assert_eq!(config.broadcast.sinks, vec![BroadcastSink::File, BroadcastSink::Http]);
        assert_eq!(config.broadcast.http_endpoint, "http://localhost:9000/hook");
        assert_eq!(config.broadcast.timeout_secs, 5);
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.yaml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_explicit_invalid_yaml_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, "broadcast:\n  sinks: [carrier-pigeon]\n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }

    #[test]
    fn test_log_level_filter() {
        assert_eq!(LogLevel::Warn.as_filter(), log::LevelFilter::Warn);
        assert_eq!(LogLevel::Off.as_filter(), log::LevelFilter::Off);
    }

    #[test]
    fn test_expand_path_no_expansion() {
        let path = PathBuf::from("/var/lib/sc-hook");
        assert_eq!(Config::expand_path(&path), PathBuf::from("/var/lib/sc-hook"));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path(&PathBuf::from("~/events"));
        assert!(!expanded.to_string_lossy().contains('~'));
        assert!(expanded.to_string_lossy().ends_with("events"));
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = Config::default();
        let yaml_str = serde_yaml::to_string(&config).expect("Failed to serialize");
        let parsed: Config = serde_yaml::from_str(&yaml_str).expect("Failed to deserialize");
        assert_eq!(parsed.defaults, config.defaults);
        assert_eq!(parsed.broadcast.sinks, config.broadcast.sinks);
        assert_eq!(parsed.log_level, config.log_level);
    }

    #[test]
    fn test_load_returns_config() {
        assert!(Config::load(None).is_ok());
    }
}
