//! JSON file persistence for tracked products.

use crate::error::StoreError;
use crate::stores::{StoreType, TrackedProduct};
use std::path::PathBuf;
use tracing::debug;

/// Persistence for tracked products.
///
/// A product is identified by its store and product id; adding a second
/// record with the same pair fails with [`StoreError::Conflict`].
pub trait ProductStore: Send + Sync {
    /// Returns all tracked products in insertion order.
    fn list(&self) -> Result<Vec<TrackedProduct>, StoreError>;

    /// Adds a product, rejecting duplicates.
    fn add(&self, product: TrackedProduct) -> Result<(), StoreError>;

    /// Removes a product, returning whether it was tracked.
    fn remove(&self, store: StoreType, product_id: &str) -> Result<bool, StoreError>;
}

/// Stores tracked products as a pretty-printed JSON array.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io { path: self.path.display().to_string(), source }
    }

    /// Sibling file the new contents are written to before replacing the store.
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn save(&self, products: &[TrackedProduct]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_vec_pretty(products).map_err(StoreError::Encode)?;

        // The store file always holds either the old or the new list
        let staging = self.staging_path();
        std::fs::write(&staging, json).map_err(|e| self.io_error(e))?;
        std::fs::rename(&staging, &self.path).map_err(|e| self.io_error(e))?;
        debug!("Saved {} products to {}", products.len(), self.path.display());
        Ok(())
    }
}

impl ProductStore for JsonFileStore {
    fn list(&self) -> Result<Vec<TrackedProduct>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content)
            .map_err(|source| StoreError::Corrupt { path: self.path.display().to_string(), source })
    }

    fn add(&self, product: TrackedProduct) -> Result<(), StoreError> {
        let mut products = self.list()?;

        if products.iter().any(|p| p.same_product(product.store_type, &product.product_id)) {
            return Err(StoreError::Conflict {
                store: product.store_type,
                product_id: product.product_id,
            });
        }

        products.push(product);
        self.save(&products)
    }

    fn remove(&self, store: StoreType, product_id: &str) -> Result<bool, StoreError> {
        let mut products = self.list()?;
        let before = products.len();

        products.retain(|p| !p.same_product(store, product_id));

        if products.len() == before {
            return Ok(false);
        }

        self.save(&products)?;
        Ok(true)
    }
}
