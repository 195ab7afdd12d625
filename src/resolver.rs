//! Resolves product URLs into normalized descriptors.

use crate::config::Config;
use crate::error::ResolveError;
use crate::reliance::{extract_item_code, PageFetcher, RelianceClient};
use crate::stores::strategies::{self, UrlParts};
use crate::stores::{classify_host, ProductDescriptor, StoreType};
use anyhow::Result;
use tracing::{debug, info, warn};
use url::Url;

/// Turns a product URL into a [`ProductDescriptor`].
///
/// Only Reliance Digital URLs touch the network, through the fetcher; every
/// other store is resolved from the URL alone.
pub struct Resolver<F> {
    fetcher: F,
}

impl Resolver<RelianceClient> {
    /// Creates a resolver backed by the real HTTP client.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(RelianceClient::new(config)?))
    }
}

impl<F: PageFetcher> Resolver<F> {
    /// Creates a resolver with a provided fetcher (for testing).
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Resolves `url`, using `part_number` for stores whose URLs lack one.
    pub async fn resolve(
        &self,
        url: &str,
        part_number: Option<&str>,
    ) -> Result<ProductDescriptor, ResolveError> {
        let parsed = parse_url(url)?;
        let store = classify(&parsed)?;
        let parts = UrlParts::from_url(&parsed);

        debug!("Resolving {} as {}", parsed, store);

        let descriptor = if store.requires_fetch() {
            self.scrape_reliance(&parsed, &parts).await?
        } else {
            strategies::resolve_from_url(store, &parts, part_number)?
        };

        info!("Resolved {} product {}", store, descriptor.product_id);
        Ok(descriptor)
    }

    async fn scrape_reliance(
        &self,
        url: &Url,
        parts: &UrlParts,
    ) -> Result<ProductDescriptor, ResolveError> {
        if parts.last().is_none() {
            return Err(ResolveError::missing_id(StoreType::RelianceDigital, "empty path"));
        }

        let html = self.fetcher.fetch_page(url.as_str()).await.map_err(|e| {
            warn!("Reliance Digital fetch failed: {:#}", e);
            ResolveError::NetworkFailure { reason: format!("{:#}", e) }
        })?;

        let item_code = extract_item_code(&html).ok_or_else(|| {
            warn!("No item code on {}", url);
            ResolveError::ExtractionFailure
        })?;

        Ok(strategies::reliance_digital(parts, item_code))
    }
}

/// Parses user input into a URL, trimming surrounding whitespace.
pub fn parse_url(input: &str) -> Result<Url, ResolveError> {
    Url::parse(input.trim()).map_err(|e| ResolveError::MalformedUrl(e.to_string()))
}

/// Identifies the store a parsed URL belongs to.
pub fn classify(url: &Url) -> Result<StoreType, ResolveError> {
    url.host_str().and_then(classify_host).ok_or(ResolveError::UnsupportedHost)
}
