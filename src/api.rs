//! Read-only client for the Stream Connector external API
//!
//! The exec endpoint is what the http sink posts to. The same server also
//! reports its own info and the external hooks it has registered; both live
//! next to exec under `/api/external/`.

use eyre::{Context, Result};
use serde_json::Value;
use std::time::Duration;

use crate::broadcast::sinks::REQUEST_ID_HEADER;

pub const INFO_PATH: &str = "/api/external/info";
pub const LIST_PATH: &str = "/api/external/list";

/// HTTP agent shared by the http sink and the API client
pub fn http_agent(timeout: Duration) -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .into()
}

/// `scheme://host[:port]` part of an endpoint URL
pub fn base_url(endpoint: &str) -> Result<String> {
    let invalid = || eyre::eyre!("Invalid endpoint '{}', expected scheme://host[:port]/path", endpoint);

    let (scheme, rest) = endpoint.split_once("://").ok_or_else(invalid)?;
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if scheme.is_empty() || authority.is_empty() {
        return Err(invalid());
    }

    Ok(format!("{}://{}", scheme, authority))
}

pub struct ExternalApi {
    base: String,
    agent: ureq::Agent,
    request_id: Option<String>,
}

impl ExternalApi {
    /// Client for the server behind the configured exec endpoint
    pub fn from_endpoint(endpoint: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            base: base_url(endpoint)?,
            agent: http_agent(timeout),
            request_id: None,
        })
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    /// Server name, version and capabilities
    pub fn info(&self) -> Result<Value> {
        self.get(INFO_PATH)
    }

    /// Registered external hooks
    pub fn list(&self) -> Result<Value> {
        self.get(LIST_PATH)
    }

    fn get(&self, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.base, path);
        log::debug!("GET {}", url);

        let mut request = self.agent.get(url.as_str()).header("Accept", "application/json");
        if let Some(id) = &self.request_id {
            request = request.header(REQUEST_ID_HEADER, id.as_str());
        }

        let mut response = request
            .call()
            .map_err(|e| eyre::eyre!("HTTP request to {} failed: {}", url, e))?;
        log::debug!("{} responded with {}", url, response.status());

        let body = response
            .body_mut()
            .read_to_string()
            .with_context(|| format!("Failed to read response from {}", url))?;
        serde_json::from_str(&body).with_context(|| format!("Failed to parse response from {}", url))
    }
}
