//! HTTP client for the Croma inventory promise API.

use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info};
use wreq::Client;
use wreq_util::Emulation;

const CROMA_API_BASE: &str = "https://api.croma.com";
const PROMISE_PATH: &str = "/inventory/oms/v2/tms/details-pwa/";

/// Trait for stock lookups - enables mocking for tests.
#[async_trait]
pub trait StockChecker: Send + Sync {
    /// Returns whether `item_id` can be delivered to `pincode`.
    async fn in_stock(&self, item_id: &str, pincode: &str) -> Result<bool>;
}

/// Croma inventory API client.
pub struct CromaClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl CromaClient {
    /// Creates a new Croma client; requires `croma_api_key` to be configured.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(config, CROMA_API_BASE.to_string())
    }

    /// Creates a new Croma client with a custom base URL (for testing).
    pub fn with_base_url(config: &Config, base_url: String) -> Result<Self> {
        let api_key = config
            .croma_api_key
            .clone()
            .context("Croma API key not configured (set croma_api_key or TRACKER_CROMA_KEY)")?;

        let mut builder = Client::builder();
        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            builder = builder.proxy(wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?);
        }

        Ok(Self { client: builder.build()?, api_key, base_url })
    }

    fn promise_request(item_id: &str, pincode: &str) -> Value {
        json!({
            "promise": {
                "allocationRuleID": "SYSTEM",
                "checkInventory": "Y",
                "organizationCode": "CROMA",
                "sourcingClassification": "EC",
                "promiseLines": {
                    "promiseLine": [{
                        "fulfillmentType": "HDEL",
                        "itemID": item_id,
                        "lineId": "1",
                        "requiredQty": "1",
                        "shipToAddress": { "zipCode": pincode },
                        "extn": { "widerStoreFlag": "N" }
                    }]
                }
            }
        })
    }
}

#[async_trait]
impl StockChecker for CromaClient {
    async fn in_stock(&self, item_id: &str, pincode: &str) -> Result<bool> {
        let url = format!("{}{}", self.base_url, PROMISE_PATH);
        let body = Self::promise_request(item_id, pincode).to_string();

        info!("Checking Croma stock: {} at {}", item_id, pincode);

        let response = self
            .client
            .post(&url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .header("oms-apim-subscription-key", self.api_key.as_str())
            .header("Origin", "https://www.croma.com")
            .header("Referer", "https://www.croma.com/")
            .body(body)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            anyhow::bail!("Croma returned status: {}", status);
        }

        let text = response.text().await.context("Failed to read response body")?;
        let data: Value = serde_json::from_str(&text).context("Croma returned invalid JSON")?;

        Ok(has_promise_lines(&data))
    }
}

/// A promise response lists deliverable lines only when the item is available.
fn has_promise_lines(data: &Value) -> bool {
    match data.pointer("/promise/suggestedOption/option/promiseLines") {
        Some(Value::Array(lines)) => !lines.is_empty(),
        Some(Value::Object(lines)) => !lines.is_empty(),
        _ => false,
    }
}
