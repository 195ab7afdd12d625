//! Supported retailers and their display labels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Retailers a product URL can be resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    Amazon,
    Flipkart,
    Croma,
    Apple,
    Vivo,
    Iqoo,
    RelianceDigital,
}

impl StoreType {
    /// Returns the parenthesized label prefixed to product names.
    pub fn label(&self) -> &'static str {
        match self {
            StoreType::Amazon => "(Amazon)",
            StoreType::Flipkart => "(Flipkart)",
            StoreType::Croma => "(Croma)",
            StoreType::Apple => "(Apple)",
            StoreType::Vivo => "(Vivo)",
            StoreType::Iqoo => "(iQOO)",
            StoreType::RelianceDigital => "(R. Digital)",
        }
    }

    /// Returns the fallback name used when the URL carries no usable slug.
    pub fn default_name(&self) -> &'static str {
        match self {
            StoreType::Amazon => "Amazon Product",
            StoreType::Flipkart => "Flipkart Product",
            StoreType::Croma => "Croma Product",
            StoreType::Apple => "Apple Product",
            StoreType::Vivo => "Vivo Product",
            StoreType::Iqoo => "iQOO Product",
            StoreType::RelianceDigital => "Reliance Digital Product",
        }
    }

    /// Returns the host substring identifying this retailer.
    pub fn signature(&self) -> &'static str {
        match self {
            StoreType::Amazon => "amazon.",
            StoreType::Flipkart => "flipkart.com",
            StoreType::Croma => "croma.com",
            StoreType::Apple => "apple.com",
            StoreType::Vivo => "vivo.com",
            StoreType::Iqoo => "iqoo",
            StoreType::RelianceDigital => "reliancedigital.in",
        }
    }

    /// Whether product names for this store are title-cased.
    pub fn title_cases_names(&self) -> bool {
        matches!(self, StoreType::Vivo | StoreType::Iqoo | StoreType::RelianceDigital)
    }

    /// Whether resolving this store needs a network fetch.
    pub fn requires_fetch(&self) -> bool {
        matches!(self, StoreType::RelianceDigital)
    }

    /// Returns all supported stores in classification order.
    pub fn all() -> &'static [StoreType] {
        &[
            StoreType::Amazon,
            StoreType::Flipkart,
            StoreType::Croma,
            StoreType::Apple,
            StoreType::Vivo,
            StoreType::Iqoo,
            StoreType::RelianceDigital,
        ]
    }
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            StoreType::Amazon => "amazon",
            StoreType::Flipkart => "flipkart",
            StoreType::Croma => "croma",
            StoreType::Apple => "apple",
            StoreType::Vivo => "vivo",
            StoreType::Iqoo => "iqoo",
            StoreType::RelianceDigital => "reliance_digital",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for StoreType {
    type Err = StoreParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "amazon" => Ok(StoreType::Amazon),
            "flipkart" => Ok(StoreType::Flipkart),
            "croma" => Ok(StoreType::Croma),
            "apple" => Ok(StoreType::Apple),
            "vivo" => Ok(StoreType::Vivo),
            "iqoo" => Ok(StoreType::Iqoo),
            "reliance_digital" | "reliance-digital" | "reliance" => Ok(StoreType::RelianceDigital),
            _ => Err(StoreParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreParseError(String);

impl fmt::Display for StoreParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown store '{}'. Valid stores: amazon, flipkart, croma, apple, vivo, iqoo, reliance_digital",
            self.0
        )
    }
}

impl std::error::Error for StoreParseError {}
