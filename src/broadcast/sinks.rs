//! Broadcaster implementations

use chrono::Local;
use eyre::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::http_agent;
use crate::hook::Broadcaster;

/// Prints each envelope as one line on stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutBroadcaster;

impl Broadcaster for StdoutBroadcaster {
    fn name(&self) -> &str {
        "stdout"
    }

    fn send(&self, json: &str) -> Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", json).context("Failed to write to stdout")?;
        out.flush().context("Failed to flush stdout")?;
        Ok(())
    }
}

/// Appends envelopes to `<dir>/<YYYY-MM>/<YYYY-MM-DD>.jsonl`
#[derive(Debug, Clone)]
pub struct FileBroadcaster {
    dir: PathBuf,
}

impl FileBroadcaster {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// File the next envelope will be appended to
    pub fn current_file(&self) -> PathBuf {
        let now = Local::now();
        self.dir
            .join(now.format("%Y-%m").to_string())
            .join(format!("{}.jsonl", now.format("%Y-%m-%d")))
    }

    fn append(path: &Path, json: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", json)
    }
}

impl Broadcaster for FileBroadcaster {
    fn name(&self) -> &str {
        "file"
    }

    fn send(&self, json: &str) -> Result<()> {
        let path = self.current_file();
        Self::append(&path, json).with_context(|| format!("Failed to append event to {}", path.display()))
    }
}

/// Header carrying the correlation id on HTTP sends
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// POSTs envelopes to an HTTP endpoint
pub struct HttpBroadcaster {
    endpoint: String,
    agent: ureq::Agent,
    request_id: Option<String>,
}

impl HttpBroadcaster {
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            agent: http_agent(timeout),
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }
}

impl Broadcaster for HttpBroadcaster {
    fn name(&self) -> &str {
        "http"
    }

    fn send(&self, json: &str) -> Result<()> {
        let mut request = self
            .agent
            .post(self.endpoint.as_str())
            .header("Content-Type", "application/json");
        if let Some(id) = &self.request_id {
            request = request.header(REQUEST_ID_HEADER, id.as_str());
        }

        let response = request
            .send(json.as_bytes())
            .map_err(|e| eyre::eyre!("HTTP request to {} failed: {}", self.endpoint, e))?;

        log::debug!("HTTP sink responded with {}", response.status());
        Ok(())
    }
}

/// Sends to every inner broadcaster; fails if any of them failed
pub struct FanoutBroadcaster {
    sinks: Vec<Box<dyn Broadcaster>>,
}

impl FanoutBroadcaster {
    pub fn new(sinks: Vec<Box<dyn Broadcaster>>) -> Result<Self> {
        if sinks.is_empty() {
            eyre::bail!("No broadcast sinks configured");
        }
        Ok(Self { sinks })
    }
}

impl Broadcaster for FanoutBroadcaster {
    fn name(&self) -> &str {
        "fanout"
    }

    fn send(&self, json: &str) -> Result<()> {
        let mut failed = Vec::new();

        for sink in &self.sinks {
            if let Err(e) = sink.send(json) {
                log::warn!("Failed to broadcast to {} sink: {:#}", sink.name(), e);
                failed.push(format!("{} ({:#})", sink.name(), e));
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            eyre::bail!(
                "{} of {} sinks failed: {}",
                failed.len(),
                self.sinks.len(),
                failed.join(", ")
            )
        }
    }
}
