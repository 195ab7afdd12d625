//! Item code extraction from Reliance Digital product pages.

use crate::reliance::selectors::{ITEM_CODE_LABEL, OG_IMAGE, SPEC_LABEL, SPEC_ROW, SPEC_VALUE};
use scraper::Html;
use std::sync::LazyLock;
use tracing::{debug, trace};

/// Nine-digit item code right before `-i-1` in product image file names.
static IMAGE_ITEM_CODE: LazyLock<regex_lite::Regex> =
    LazyLock::new(|| regex_lite::Regex::new(r"(?:^|[^0-9])([0-9]{9})-i-1").unwrap());

type Extractor = fn(&Html) -> Option<String>;

/// Extraction tiers, tried in order until one yields a code.
const TIERS: [(&str, Extractor); 2] =
    [("specifications", from_specifications), ("og:image", from_og_image)];

/// Extracts the item code from a product page, or `None` if no tier finds one.
pub fn extract_item_code(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    TIERS.iter().find_map(|(tier, extract)| {
        let code = extract(&document);
        match &code {
            Some(code) => debug!("Item code {} found via {}", code, tier),
            None => trace!("No item code via {}", tier),
        }
        code
    })
}

/// Reads the value of the first `Item Code` row in the specifications list.
fn from_specifications(document: &Html) -> Option<String> {
    let row = document.select(&SPEC_ROW).find(|row| {
        row.select(&SPEC_LABEL)
            .next()
            .is_some_and(|label| label.text().collect::<String>().trim() == ITEM_CODE_LABEL)
    })?;

    row.select(&SPEC_VALUE)
        .next()
        .map(|value| value.text().collect::<String>().trim().to_string())
        .filter(|code| !code.is_empty())
}

/// Pulls the item code out of the Open Graph image URL.
fn from_og_image(document: &Html) -> Option<String> {
    let content = document.select(&OG_IMAGE).next()?.value().attr("content")?;

    IMAGE_ITEM_CODE.captures(content).map(|c| c[1].to_string())
}
