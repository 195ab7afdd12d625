//! Reliance Digital page fetching and item code scraping.

pub mod client;
pub mod parser;
pub mod selectors;

pub use client::{PageFetcher, RelianceClient};
pub use parser::extract_item_code;
