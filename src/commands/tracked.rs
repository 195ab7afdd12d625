//! List and remove commands for tracked products.

use crate::config::Config;
use crate::format::Formatter;
use crate::stores::StoreType;
use crate::tracker::{JsonFileStore, ProductStore};
use anyhow::{Context, Result};
use tracing::info;

/// Manages the tracked product list.
pub struct TrackedCommand {
    config: Config,
}

impl TrackedCommand {
    /// Creates a new tracked-products command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn open_store(&self) -> Result<JsonFileStore> {
        Ok(JsonFileStore::new(self.config.data_path()?))
    }

    /// Lists tracked products.
    pub fn list(&self) -> Result<String> {
        self.list_with(&self.open_store()?)
    }

    /// Lists tracked products from a provided store (for testing).
    pub fn list_with(&self, store: &impl ProductStore) -> Result<String> {
        let products = store.list().context("Failed to load tracked products")?;

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_tracked(&products))
    }

    /// Stops tracking a product.
    pub fn remove(&self, store_type: StoreType, product_id: &str) -> Result<String> {
        self.remove_with(&self.open_store()?, store_type, product_id)
    }

    /// Removes a product from a provided store (for testing).
    pub fn remove_with(
        &self,
        store: &impl ProductStore,
        store_type: StoreType,
        product_id: &str,
    ) -> Result<String> {
        let removed =
            store.remove(store_type, product_id.trim()).context("Failed to update tracked products")?;

        if !removed {
            anyhow::bail!("{} product {} is not tracked", store_type, product_id.trim());
        }

        info!("Removed {} product {}", store_type, product_id);
        Ok(format!("Stopped tracking {} product {}", store_type, product_id.trim()))
    }
}
