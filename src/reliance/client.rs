//! HTTP client for Reliance Digital product pages.

use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info};
use wreq::Client;

/// Trait for fetching product pages - enables mocking for tests.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches a page and returns its HTML body.
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

/// Fetches product pages while identifying as a mobile browser.
///
/// The item code only appears in the mobile layout. No timeout or retry is
/// configured; a failed request is reported straight back to the caller.
pub struct RelianceClient {
    client: Client,
    user_agent: String,
}

impl RelianceClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder().cookie_store(true).gzip(true).brotli(true);

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self { client, user_agent: config.user_agent.clone() })
    }
}

#[async_trait]
impl PageFetcher for RelianceClient {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        info!("Fetching product page: {}", url);

        let response = self
            .client
            .get(url)
            .header("User-Agent", self.user_agent.as_str())
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "en-IN,en;q=0.9,hi;q=0.8")
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            anyhow::bail!("Request failed with status: {}", status);
        }

        response.text().await.context("Failed to read response body")
    }
}
