//! Affiliate link construction for stores with partner programs.

use crate::config::Config;
use crate::stores::kind::StoreType;
use url::Url;

/// Builds an affiliate link for a resolved product, if the store has a
/// configured partner id.
pub fn affiliate_link(
    store: StoreType,
    product_id: &str,
    url: &Url,
    config: &Config,
) -> Option<String> {
    match store {
        StoreType::Amazon => config.amazon_tag.as_deref().map(|tag| {
            format!(
                "https://{}/dp/{}?tag={}",
                url.host_str().unwrap_or("www.amazon.in"),
                product_id,
                urlencoding::encode(tag)
            )
        }),
        StoreType::Flipkart => config.flipkart_affiliate_id.as_deref().map(|affid| {
            let mut link = url.clone();
            link.query_pairs_mut().append_pair("affid", affid);
            link.to_string()
        }),
        _ => None,
    }
}
