//! Error types for product resolution and the tracker store.

use crate::stores::StoreType;
use thiserror::Error;

/// Reasons a URL could not be resolved into a product descriptor.
///
/// The `Display` output is shown to users verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Invalid URL: {0}")]
    MalformedUrl(String),

    #[error("Unsupported store. Supported stores: Amazon, Flipkart, Croma, Apple, Vivo, iQOO, Reliance Digital")]
    UnsupportedHost,

    #[error("Could not find the product ID in the {store} URL: {reason}")]
    MissingIdentifier { store: StoreType, reason: String },

    #[error("{store} products require a part number")]
    MissingSecondaryIdentifier { store: StoreType },

    #[error("Could not extract the item code: {reason}")]
    NetworkFailure { reason: String },

    #[error("Could not extract the item code from the product page")]
    ExtractionFailure,
}

impl ResolveError {
    pub(crate) fn missing_id(store: StoreType, reason: impl Into<String>) -> Self {
        ResolveError::MissingIdentifier { store, reason: reason.into() }
    }
}

/// Errors raised by the tracked-product store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{store} product {product_id} is already tracked")]
    Conflict { store: StoreType, product_id: String },

    #[error("failed to access store file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("store file {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode tracked products: {0}")]
    Encode(#[source] serde_json::Error),
}
