//! CSS selectors for the Reliance Digital mobile product page.
//!
//! The desktop layout does not render the specification list, so these
//! target the markup served to mobile user agents.

use scraper::Selector;
use std::sync::LazyLock;

/// One row of the specifications list.
pub static SPEC_ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li.specifications-list").unwrap());

/// Label cell of a specification row.
pub static SPEC_LABEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span").unwrap());

/// Right-hand value list nested in a specification row.
pub static SPEC_VALUE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul.specifications-list--right").unwrap());

/// Open Graph image meta tag.
pub static OG_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta[property='og:image']").unwrap());

/// Label of the row holding the item code.
pub const ITEM_CODE_LABEL: &str = "Item Code";
