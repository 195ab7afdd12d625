//! Per-store extraction rules for URLs that carry their product id.

use crate::error::ResolveError;
use crate::stores::kind::StoreType;
use crate::stores::models::ProductDescriptor;
use crate::stores::naming::{is_numeric, meaningful_slug, product_name};
use url::Url;

/// Path and query components of a product URL.
#[derive(Debug, Clone, Default)]
pub struct UrlParts {
    /// `/`-separated path components, including empty ones
    raw: Vec<String>,
    /// Non-empty path components
    segments: Vec<String>,
    /// Decoded query pairs in URL order
    query: Vec<(String, String)>,
}

impl UrlParts {
    /// Splits a parsed URL into path segments and query pairs.
    pub fn from_url(url: &Url) -> Self {
        let raw: Vec<String> = url
            .path_segments()
            .map(|segments| segments.map(String::from).collect())
            .unwrap_or_default();

        let segments = raw.iter().filter(|s| !s.is_empty()).cloned().collect();

        let query = url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect();

        Self { raw, segments, query }
    }

    /// Returns the non-empty segment at `index`.
    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    /// Returns the first path component as written, which may be empty.
    pub fn first_raw(&self) -> Option<&str> {
        self.raw.first().map(String::as_str).filter(|s| !s.is_empty())
    }

    /// Returns the last non-empty segment.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Returns the non-empty segment before the last one.
    pub fn second_last(&self) -> Option<&str> {
        let len = self.segments.len();
        len.checked_sub(2).and_then(|i| self.segment(i))
    }

    /// Returns the position of the first segment equal to `literal`.
    pub fn position(&self, literal: &str) -> Option<usize> {
        self.segments.iter().position(|s| s == literal)
    }

    /// Returns the first non-empty value of query parameter `name`.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, v)| k == name && !v.trim().is_empty())
            .map(|(_, v)| v.trim())
    }
}

/// Runs the URL-only strategy for `store`.
///
/// Reliance Digital needs a page fetch and is handled by the resolver; it is
/// rejected here with a missing-identifier error.
pub fn resolve_from_url(
    store: StoreType,
    parts: &UrlParts,
    part_number: Option<&str>,
) -> Result<ProductDescriptor, ResolveError> {
    match store {
        StoreType::Amazon => amazon(parts),
        StoreType::Flipkart => flipkart(parts),
        StoreType::Croma => croma(parts),
        StoreType::Apple => apple(parts, part_number),
        StoreType::Vivo | StoreType::Iqoo => trailing_segment(store, parts),
        StoreType::RelianceDigital => {
            Err(ResolveError::missing_id(store, "item code is only available from the product page"))
        }
    }
}

/// Builds the Reliance Digital descriptor once the item code is known.
pub fn reliance_digital(parts: &UrlParts, item_code: String) -> ProductDescriptor {
    ProductDescriptor {
        name: product_name(StoreType::RelianceDigital, parts.second_last()),
        product_id: item_code,
        store_type: StoreType::RelianceDigital,
        part_number: parts.last().map(String::from),
    }
}

fn descriptor(store: StoreType, product_id: &str, slug: Option<&str>) -> ProductDescriptor {
    ProductDescriptor {
        name: product_name(store, slug),
        product_id: product_id.to_string(),
        store_type: store,
        part_number: None,
    }
}

/// `/<slug>/dp/<ASIN>`
fn amazon(parts: &UrlParts) -> Result<ProductDescriptor, ResolveError> {
    let store = StoreType::Amazon;
    let dp = parts.position("dp").ok_or_else(|| ResolveError::missing_id(store, "no /dp/ segment"))?;

    let asin = parts
        .segment(dp + 1)
        .ok_or_else(|| ResolveError::missing_id(store, "nothing follows /dp/"))?;

    let slug = dp.checked_sub(1).and_then(|i| parts.segment(i));
    Ok(descriptor(store, asin, slug))
}

/// `/<slug>/p/<itm>?pid=<PID>`
fn flipkart(parts: &UrlParts) -> Result<ProductDescriptor, ResolveError> {
    let store = StoreType::Flipkart;
    let pid = parts
        .query_param("pid")
        .ok_or_else(|| ResolveError::missing_id(store, "missing pid query parameter"))?;

    Ok(descriptor(store, pid, parts.segment(0)))
}

/// `/<slug>/p/<numeric id>`
fn croma(parts: &UrlParts) -> Result<ProductDescriptor, ResolveError> {
    let store = StoreType::Croma;
    let id = parts.last().ok_or_else(|| ResolveError::missing_id(store, "empty path"))?;

    if !is_numeric(id) {
        return Err(ResolveError::missing_id(
            store,
            format!("'{}' is not a numeric product id", id),
        ));
    }

    Ok(descriptor(store, id, parts.first_raw()))
}

/// Apple URLs carry no part number, so the caller must supply one.
fn apple(parts: &UrlParts, part_number: Option<&str>) -> Result<ProductDescriptor, ResolveError> {
    let store = StoreType::Apple;
    let part_number = part_number
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or(ResolveError::MissingSecondaryIdentifier { store })?;

    let mut descriptor = descriptor(store, part_number, parts.segment(3));
    descriptor.part_number = Some(part_number.to_string());
    Ok(descriptor)
}

/// Vivo and iQOO: the id is the trailing segment, the name the one before it.
fn trailing_segment(store: StoreType, parts: &UrlParts) -> Result<ProductDescriptor, ResolveError> {
    let id = parts.last().ok_or_else(|| ResolveError::missing_id(store, "empty path"))?;

    Ok(descriptor(store, id, meaningful_slug(parts.second_last())))
}
