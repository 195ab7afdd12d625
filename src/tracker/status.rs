//! Stock check results.

use crate::amazon::AmazonOffer;
use crate::stores::{StoreType, TrackedProduct};
use serde::{Deserialize, Serialize};

/// Outcome of checking one tracked product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockStatus {
    /// Tracked product name
    pub name: String,
    /// Store product id
    pub product_id: String,
    /// Store the product belongs to
    pub store_type: StoreType,
    /// Affiliate link or product URL
    pub link: String,
    /// First pincode a Croma product can be delivered to
    pub available_at: Option<String>,
    /// Current Amazon offer
    pub offer: Option<AmazonOffer>,
    /// Lookup error, if the product could not be checked
    pub error: Option<String>,
}

impl StockStatus {
    /// Creates an unchecked status for a tracked product.
    pub fn for_product(product: &TrackedProduct) -> Self {
        Self {
            name: product.name.clone(),
            product_id: product.product_id.clone(),
            store_type: product.store_type,
            link: product.link().to_string(),
            available_at: None,
            offer: None,
            error: None,
        }
    }

    /// Returns true if the product is deliverable or listed with an offer.
    pub fn in_stock(&self) -> bool {
        self.available_at.is_some() || self.offer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_product(store_type: StoreType) -> TrackedProduct {
        TrackedProduct {
            name: "(Amazon) Iphone...".to_string(),
            url: "https://www.amazon.in/dp/B0CX59H5W7".to_string(),
            product_id: "B0CX59H5W7".to_string(),
            store_type,
            part_number: None,
            affiliate_link: Some("https://www.amazon.in/dp/B0CX59H5W7?tag=t-21".to_string()),
        }
    }

    #[test]
    fn test_for_product_prefers_affiliate_link() {
        let status = StockStatus::for_product(&make_product(StoreType::Amazon));
        assert_eq!(status.link, "https://www.amazon.in/dp/B0CX59H5W7?tag=t-21");
        assert_eq!(status.store_type, StoreType::Amazon);
        assert!(!status.in_stock());
    }

    #[test]
    fn test_in_stock_sources() {
        let base = StockStatus::for_product(&make_product(StoreType::Croma));

        let croma = StockStatus { available_at: Some("132001".to_string()), ..base.clone() };
        assert!(croma.in_stock());

        let amazon = StockStatus {
            offer: Some(AmazonOffer {
                title: "Apple iPhone 15".to_string(),
                price: "₹79,900.00".to_string(),
                availability: "In stock".to_string(),
            }),
            ..base
        };
        assert!(amazon.in_stock());
    }
}
