//! Display-name normalization shared by every store strategy.

use crate::stores::kind::StoreType;
use std::borrow::Cow;

/// Maximum characters kept from a name before the ellipsis is appended.
pub const MAX_NAME_CHARS: usize = 50;

/// Marker appended to every (possibly truncated) name.
pub const ELLIPSIS: &str = "...";

/// Builds the display name for a product from an optional URL slug.
///
/// Falls back to the store's default name when the slug is missing or
/// blank, then applies hyphen replacement, optional title-casing,
/// truncation and the store label prefix.
pub fn product_name(store: StoreType, slug: Option<&str>) -> String {
    let humanized = slug.map(humanize).filter(|s| !s.is_empty());

    let body = match humanized {
        Some(name) if store.title_cases_names() => title_case(&name),
        Some(name) => name,
        None => store.default_name().to_string(),
    };

    format!("{} {}", store.label(), truncate(&body))
}

/// Drops slugs that carry no product information.
///
/// Listing paths such as `/product/10086` leave either the literal
/// `product` or a numeric id in the name position; those are replaced by
/// the store default.
pub fn meaningful_slug(segment: Option<&str>) -> Option<&str> {
    segment.filter(|s| !s.eq_ignore_ascii_case("product") && !is_numeric(s))
}

/// Returns true when the string is non-empty and made only of ASCII digits.
pub fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Percent-decodes a path segment and turns hyphens into spaces.
pub fn humanize(segment: &str) -> String {
    let decoded = urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment));
    decoded.replace('-', " ").trim().to_string()
}

/// Upper-cases the first character of every word, leaving the rest untouched.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;

    for c in s.chars() {
        let is_word = c.is_alphanumeric() || c == '_';
        if is_word && at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !is_word;
    }

    out
}

/// Truncates to [`MAX_NAME_CHARS`] characters and appends [`ELLIPSIS`].
pub fn truncate(s: &str) -> String {
    let kept: String = s.chars().take(MAX_NAME_CHARS).collect();
    format!("{}{}", kept, ELLIPSIS)
}
