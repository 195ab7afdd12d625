//! Resolved product descriptors and tracked-product records.

use crate::stores::kind::StoreType;
use serde::{Deserialize, Serialize};

/// Normalized result of resolving a product URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDescriptor {
    /// Store-prefixed display name
    pub name: String,
    /// Retailer-specific product identifier
    pub product_id: String,
    /// Retailer the URL belongs to
    pub store_type: StoreType,
    /// Secondary identifier (Apple part number or Reliance Digital slug)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,
}

/// A product persisted in the tracker store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedProduct {
    pub name: String,
    pub url: String,
    pub product_id: String,
    pub store_type: StoreType,
    #[serde(default)]
    pub part_number: Option<String>,
    #[serde(default)]
    pub affiliate_link: Option<String>,
}

impl TrackedProduct {
    /// Builds a record from a resolved descriptor and its source URL.
    pub fn new(descriptor: ProductDescriptor, url: impl Into<String>) -> Self {
        Self {
            name: descriptor.name,
            url: url.into(),
            product_id: descriptor.product_id,
            store_type: descriptor.store_type,
            part_number: descriptor.part_number,
            affiliate_link: None,
        }
    }

    /// Sets the affiliate link.
    pub fn with_affiliate_link(mut self, link: Option<String>) -> Self {
        self.affiliate_link = link;
        self
    }

    /// Returns the affiliate link, or the plain URL when there is none.
    pub fn link(&self) -> &str {
        self.affiliate_link.as_deref().unwrap_or(&self.url)
    }

    /// Returns true if this record identifies the same product as `other`.
    pub fn same_product(&self, store: StoreType, product_id: &str) -> bool {
        self.store_type == store && self.product_id == product_id
    }
}
