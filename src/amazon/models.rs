//! Product Advertising API response models.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Offer details for a listed Amazon item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmazonOffer {
    /// Item title as listed
    pub title: String,
    /// Display price, e.g. "₹79,900.00"
    pub price: String,
    /// Availability message, e.g. "In stock"
    pub availability: String,
}

/// `GetItems` response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct GetItemsResponse {
    items_result: Option<ItemsResult>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ItemsResult {
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Item {
    item_info: Option<ItemInfo>,
    offers: Option<Offers>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ItemInfo {
    title: Option<DisplayValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DisplayValue {
    display_value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Offers {
    #[serde(default)]
    listings: Vec<Listing>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Listing {
    price: Option<Price>,
    availability: Option<Availability>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Price {
    display_amount: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Availability {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiError {
    code: String,
    message: String,
}

impl GetItemsResponse {
    /// Returns the first API error as `code: message`, if any.
    pub(crate) fn error_summary(&self) -> Option<String> {
        self.errors.first().map(|e| format!("{}: {}", e.code, e.message))
    }

    /// Extracts the offer of the first returned item.
    ///
    /// Title, price and availability of the first listing are all required.
    pub(crate) fn into_offer(self) -> Result<AmazonOffer> {
        let summary = self.error_summary();

        let Some(item) = self.items_result.and_then(|r| r.items.into_iter().next()) else {
            match summary {
                Some(summary) => bail!("PA-API error {}", summary),
                None => bail!("GetItems returned no items"),
            }
        };

        let title = item
            .item_info
            .and_then(|info| info.title)
            .map(|t| t.display_value)
            .context("Item has no title")?;

        let listing = item
            .offers
            .and_then(|offers| offers.listings.into_iter().next())
            .context("Item has no offer listing")?;

        let price = listing.price.map(|p| p.display_amount).context("Listing has no price")?;
        let availability = listing
            .availability
            .map(|a| a.message)
            .context("Listing has no availability message")?;

        Ok(AmazonOffer { title, price, availability })
    }
}
