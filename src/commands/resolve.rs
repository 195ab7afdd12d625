//! Resolve and add command implementations.

use crate::config::Config;
use crate::error::StoreError;
use crate::format::Formatter;
use crate::reliance::PageFetcher;
use crate::resolver::{parse_url, Resolver};
use crate::stores::{affiliate_link, TrackedProduct};
use crate::tracker::{JsonFileStore, ProductStore};
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Resolves product URLs and optionally starts tracking them.
pub struct ResolveCommand {
    config: Config,
}

impl ResolveCommand {
    /// Creates a new resolve command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Resolves a URL and returns the formatted descriptor.
    pub async fn execute(&self, url: &str, part_number: Option<&str>) -> Result<String> {
        let resolver = Resolver::from_config(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_resolver(&resolver, url, part_number).await
    }

    /// Resolves a URL with a provided resolver (for testing).
    pub async fn execute_with_resolver<F: PageFetcher>(
        &self,
        resolver: &Resolver<F>,
        url: &str,
        part_number: Option<&str>,
    ) -> Result<String> {
        let descriptor = resolver.resolve(url, part_number).await?;

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_descriptor(&descriptor))
    }

    /// Resolves a URL, persists it to the tracker store and returns the formatted record.
    pub async fn add(&self, url: &str, part_number: Option<&str>) -> Result<String> {
        let resolver = Resolver::from_config(&self.config).context("Failed to create HTTP client")?;
        let store = JsonFileStore::new(self.config.data_path()?);

        self.add_with(&resolver, &store, url, part_number).await
    }

    /// Adds a product with a provided resolver and store (for testing).
    pub async fn add_with<F: PageFetcher>(
        &self,
        resolver: &Resolver<F>,
        store: &impl ProductStore,
        url: &str,
        part_number: Option<&str>,
    ) -> Result<String> {
        let descriptor = resolver.resolve(url, part_number).await?;

        let parsed = parse_url(url)?;
        let link =
            affiliate_link(descriptor.store_type, &descriptor.product_id, &parsed, &self.config);
        let product = TrackedProduct::new(descriptor, parsed.as_str()).with_affiliate_link(link);

        match store.add(product.clone()) {
            Ok(()) => {}
            Err(StoreError::Conflict { store, product_id }) => {
                warn!("Duplicate {} product {}", store, product_id);
                anyhow::bail!("Failed to add product. It may already be tracked.");
            }
            Err(e) => return Err(e).context("Failed to add product"),
        }

        info!("Tracking {} product {}", product.store_type, product.product_id);

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_tracked(std::slice::from_ref(&product)))
    }
}
