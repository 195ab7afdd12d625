//! Product Advertising API 5.0 client for the amazon.in marketplace.

use crate::amazon::models::{AmazonOffer, GetItemsResponse};
use crate::amazon::signer::Signer;
use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};
use url::Url;
use wreq::Client;

const PAAPI_BASE: &str = "https://webservices.amazon.in";
const GET_ITEMS_PATH: &str = "/paapi5/getitems";
const GET_ITEMS_TARGET: &str = "com.amazon.paapi5.v1.ProductAdvertisingAPIv1.GetItems";
const MARKETPLACE: &str = "www.amazon.in";
const REGION: &str = "eu-west-1";
const SERVICE: &str = "ProductAdvertisingAPI";

const RESOURCES: [&str; 3] =
    ["ItemInfo.Title", "Offers.Listings.Price", "Offers.Listings.Availability.Message"];

/// Trait for Amazon offer lookups - enables mocking for tests.
#[async_trait]
pub trait OfferLookup: Send + Sync {
    /// Returns the current offer for `asin`.
    async fn lookup(&self, asin: &str) -> Result<AmazonOffer>;
}

/// Signed `GetItems` client.
pub struct PaapiClient {
    client: Client,
    signer: Signer,
    partner_tag: String,
    base_url: String,
    host: String,
}

impl PaapiClient {
    /// Creates a new client; requires AWS credentials and the partner tag.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(config, PAAPI_BASE.to_string())
    }

    /// Creates a new client with a custom base URL (for testing).
    pub fn with_base_url(config: &Config, base_url: String) -> Result<Self> {
        let access_key = config
            .aws_access_key_id
            .clone()
            .context("AWS access key not configured (set aws_access_key_id or TRACKER_AWS_ACCESS_KEY)")?;
        let secret_key = config.aws_secret_access_key.clone().context(
            "AWS secret key not configured (set aws_secret_access_key or TRACKER_AWS_SECRET_KEY)",
        )?;
        let partner_tag = config
            .amazon_tag
            .clone()
            .context("Amazon partner tag not configured (set amazon_tag or TRACKER_AMAZON_TAG)")?;

        let parsed = Url::parse(&base_url).context("Invalid PA-API base URL")?;
        let host = match (parsed.host_str(), parsed.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => anyhow::bail!("PA-API base URL has no host: {}", base_url),
        };

        let mut builder = Client::builder();
        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            builder = builder.proxy(wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?);
        }

        Ok(Self {
            client: builder.build()?,
            signer: Signer::new(access_key, secret_key, REGION, SERVICE),
            partner_tag,
            base_url,
            host,
        })
    }

    fn get_items_body(&self, asin: &str) -> String {
        json!({
            "ItemIds": [asin],
            "Resources": RESOURCES,
            "PartnerTag": self.partner_tag,
            "PartnerType": "Associates",
            "Marketplace": MARKETPLACE,
        })
        .to_string()
    }
}

#[async_trait]
impl OfferLookup for PaapiClient {
    async fn lookup(&self, asin: &str) -> Result<AmazonOffer> {
        let url = format!("{}{}", self.base_url, GET_ITEMS_PATH);
        let body = self.get_items_body(asin);
        let amz_date = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();

        let signed = [
            ("content-encoding", "amz-1.0"),
            ("host", self.host.as_str()),
            ("x-amz-date", amz_date.as_str()),
            ("x-amz-target", GET_ITEMS_TARGET),
        ];
        let authorization =
            self.signer.authorization("POST", GET_ITEMS_PATH, &signed, body.as_bytes(), &amz_date)?;

        info!("Looking up Amazon item: {}", asin);

        let response = self
            .client
            .post(&url)
            .header("Content-Encoding", "amz-1.0")
            .header("Content-Type", "application/json; charset=UTF-8")
            .header("X-Amz-Date", amz_date.as_str())
            .header("X-Amz-Target", GET_ITEMS_TARGET)
            .header("Authorization", authorization)
            .header("Accept", "application/json, text/javascript")
            .body(body)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        debug!("Response status: {}", status);

        let text = response.text().await.context("Failed to read response body")?;
        let parsed: Option<GetItemsResponse> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            match parsed.and_then(|p| p.error_summary()) {
                Some(summary) => anyhow::bail!("PA-API returned status {}: {}", status, summary),
                None => anyhow::bail!("PA-API returned status: {}", status),
            }
        }

        parsed.context("PA-API returned invalid JSON")?.into_offer()
    }
}
