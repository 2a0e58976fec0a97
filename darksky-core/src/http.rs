use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::Client;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings handed to an API client when it is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl ServiceSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn client(&self) -> Result<Client> {
        let mut builder = Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("darksky-cli/", env!("CARGO_PKG_VERSION")));
        if is_loopback(&self.base_url) {
            builder = builder.no_proxy();
        }
        builder.build().context("Failed to build HTTP client")
    }
}

/// Local endpoints are reached directly, never through a proxy from the environment.
fn is_loopback(base_url: &str) -> bool {
    reqwest::Url::parse(base_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_owned))
        .is_some_and(|host| matches!(host.as_str(), "localhost" | "127.0.0.1" | "[::1]"))
}

/// Read a response body, failing on any non-success status.
pub(crate) async fn success_body(res: reqwest::Response, what: &str) -> Result<String> {
    let status = res.status();
    let body = res
        .text()
        .await
        .with_context(|| format!("Failed to read {what} response body"))?;

    if !status.is_success() {
        return Err(anyhow!(
            "{what} request failed with status {}: {}",
            status,
            truncate_body(&body),
        ));
    }

    Ok(body)
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|&i| body.is_char_boundary(i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}

/// Replace the secret in a URL or message before it is logged.
pub(crate) fn redact(text: &str, secret: Option<&str>) -> String {
    match secret {
        Some(s) if !s.is_empty() => text.replace(s, "<redacted>"),
        _ => text.to_string(),
    }
}
